//! Password based document security setup

use crate::encryption::{
    pad_password, EncryptionDictionary, EncryptionKey, EncryptionSession, Permissions,
    SecurityHandlerRevision, StandardSecurityHandler,
};
use crate::error::{PdfError, Result};
use crate::objects::Dictionary;
use tracing::debug;

/// What the caller asks for when encrypting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOptions {
    /// Password granting full access.
    pub owner_password: String,
    /// Password needed to open the document; the owner password when unset.
    pub user_password: Option<String>,
    pub permissions: Permissions,
    pub revision: SecurityHandlerRevision,
}

impl SecurityOptions {
    pub fn new(owner_password: impl Into<String>) -> Self {
        Self {
            owner_password: owner_password.into(),
            user_password: None,
            permissions: Permissions::default(),
            revision: SecurityHandlerRevision::R4,
        }
    }

    pub fn with_user_password(mut self, password: impl Into<String>) -> Self {
        self.user_password = Some(password.into());
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_revision(mut self, revision: SecurityHandlerRevision) -> Self {
        self.revision = revision;
        self
    }
}

/// Key material and `Encrypt` dictionary for one document.
#[derive(Debug, Clone)]
pub struct PdfSecurity {
    key: EncryptionKey,
    dictionary: EncryptionDictionary,
}

impl PdfSecurity {
    /// Derive the document key and the `O`/`U` entries.
    ///
    /// `first_id` is the first element of the file identifier.
    pub fn create(first_id: &[u8], options: &SecurityOptions) -> Result<Self> {
        if options.owner_password.is_empty() {
            return Err(PdfError::InvalidPassword(
                "No owner password is defined".to_string(),
            ));
        }

        let handler = StandardSecurityHandler::for_revision(options.revision)?;
        let owner_padded = pad_password(&options.owner_password)?;
        let user_padded = match &options.user_password {
            Some(password) => pad_password(password)?,
            None => owner_padded,
        };

        let permissions = options.permissions.p_value();
        let o = handler.compute_owner_entry(&owner_padded, &user_padded)?;
        let key = handler.compute_encryption_key(&user_padded, &o, permissions, first_id);
        let u = handler.compute_user_entry(&key, first_id)?;

        debug!(
            revision = handler.revision().number(),
            key_bits = handler.key_bits(),
            p = permissions,
            "derived document encryption key"
        );

        Ok(Self {
            key,
            dictionary: EncryptionDictionary::aes_128(handler.revision(), o, u, options.permissions),
        })
    }

    pub fn encryption_key(&self) -> &EncryptionKey {
        &self.key
    }

    pub fn encryption_dictionary(&self) -> &EncryptionDictionary {
        &self.dictionary
    }

    /// The dictionary to register as the trailer's `Encrypt` entry.
    pub fn encryption_dict(&self) -> Dictionary {
        self.dictionary.to_dict()
    }

    /// A fresh session for one write.
    pub fn session(&self) -> EncryptionSession {
        EncryptionSession::new(self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::PASSWORD_PADDING;
    use crate::objects::Object;

    const PASSWORD_O: [u8; 32] = [
        64, 139, 55, 188, 241, 45, 168, 115, 215, 242, 132, 15, 60, 27, 145, 122, 2, 57, 97, 222,
        212, 200, 22, 77, 56, 228, 110, 150, 85, 230, 103, 117,
    ];

    const ANOTHER_O: [u8; 32] = [
        53, 84, 196, 144, 24, 240, 179, 137, 35, 126, 199, 205, 18, 73, 237, 86, 6, 139, 151, 170,
        252, 172, 99, 58, 160, 204, 46, 24, 220, 89, 196, 178,
    ];

    #[test]
    fn test_owner_entry_ignores_id() {
        for (password, expected) in [("password", PASSWORD_O), ("anotherpassword", ANOTHER_O)] {
            for id in [[0u8], [1u8]] {
                let security = PdfSecurity::create(&id, &SecurityOptions::new(password)).unwrap();
                assert_eq!(security.encryption_dictionary().o, expected);
            }
        }
    }

    #[test]
    fn test_user_entry_depends_on_id() {
        let cases: [(&str, u8, [u8; 16]); 4] = [
            ("password", 0, [151, 154, 125, 222, 5, 128, 193, 61, 92, 50, 158, 147, 172, 200, 21, 236]),
            ("password", 1, [235, 101, 71, 201, 13, 249, 39, 64, 71, 163, 191, 1, 75, 250, 166, 197]),
            ("anotherpassword", 0, [105, 165, 13, 85, 211, 14, 160, 149, 165, 243, 185, 29, 133, 91, 22, 184]),
            ("anotherpassword", 1, [132, 224, 68, 112, 80, 228, 36, 22, 163, 162, 62, 212, 241, 225, 226, 239]),
        ];
        for (password, id, expected) in cases {
            let security = PdfSecurity::create(&[id], &SecurityOptions::new(password)).unwrap();
            let u = &security.encryption_dictionary().u;
            assert_eq!(&u[..16], &expected, "{password} / {id}");
            assert_eq!(&u[16..], &PASSWORD_PADDING[..16]);
        }
    }

    #[test]
    fn test_dictionary_fields() {
        let security = PdfSecurity::create(&[0], &SecurityOptions::new("password")).unwrap();
        let dict = security.encryption_dict();
        assert_eq!(dict.get("Filter"), Some(&Object::name("Standard")));
        assert_eq!(dict.get("V"), Some(&Object::Integer(4)));
        assert_eq!(dict.get("Length"), Some(&Object::Integer(128)));
        assert_eq!(dict.get("R"), Some(&Object::Integer(4)));
        assert_eq!(dict.get("P"), Some(&Object::Integer(0)));
        assert_eq!(
            dict.get_dict("CF").and_then(|cf| cf.get_dict("StdCF")).map(|f| f.to_string()),
            Some("<<\n/CFM /AESV2\n/Length 16\n>>".to_string())
        );
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = PdfSecurity::create(&[0], &SecurityOptions::new(""));
        assert!(matches!(result, Err(PdfError::InvalidPassword(_))));
    }

    #[test]
    fn test_wide_password_rejected() {
        let result = PdfSecurity::create(&[0], &SecurityOptions::new("\u{263A}"));
        assert!(matches!(result, Err(PdfError::InvalidPassword(_))));
    }

    #[test]
    fn test_revision_5_rejected() {
        let options = SecurityOptions::new("password").with_revision(SecurityHandlerRevision::R5);
        assert!(matches!(
            PdfSecurity::create(&[0], &options),
            Err(PdfError::UnsupportedSecurityHandler(5))
        ));
    }

    #[test]
    fn test_permissions_change_key() {
        let plain = PdfSecurity::create(&[0], &SecurityOptions::new("password")).unwrap();
        let restricted = PdfSecurity::create(
            &[0],
            &SecurityOptions::new("password").with_permissions(Permissions::PRINT),
        )
        .unwrap();
        assert_ne!(plain.encryption_key(), restricted.encryption_key());
        assert_eq!(
            restricted.encryption_dict().get("P"),
            Some(&Object::Integer(4))
        );
    }

    #[test]
    fn test_separate_user_password() {
        let shared = PdfSecurity::create(&[0], &SecurityOptions::new("password")).unwrap();
        let separate = PdfSecurity::create(
            &[0],
            &SecurityOptions::new("password").with_user_password("reader"),
        )
        .unwrap();
        assert_ne!(shared.encryption_dictionary().o, separate.encryption_dictionary().o);
    }
}
