//! End-to-end tests for the two-phase writer

use flate2::read::ZlibDecoder;
use pdfpack::encryption::{EncryptionSession, FixedIv, SecurityOptions};
use pdfpack::objects::{Dictionary, HexString, Object, ObjectId, RawStream};
use pdfpack::{PdfContext, PdfError, PdfWriter, WriterConfig, WriterPhase};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// The nine objects of the reference layout, registered as objects 1..=9.
fn nine_object_context() -> PdfContext {
    let mut context = PdfContext::new();
    let objects = vec![
        Object::Array(vec![]),
        Object::TRUE,
        Object::Dictionary(Dictionary::new()),
        Object::HexString(HexString::of("ABC123")),
        Object::Reference(ObjectId::of(21)),
        Object::name("QuxBaz"),
        Object::NULL,
        Object::Integer(21),
        Object::string("Stuff and thingz"),
    ];
    for object in objects {
        context.register(object);
    }
    context.trailer_info_mut().root = Some(ObjectId::of(3));
    context
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pdfpack=trace")
        .with_test_writer()
        .try_init();
}

fn uncompressed() -> WriterConfig {
    WriterConfig::default().with_compression(false)
}

#[tokio::test]
async fn test_compacted_output_is_byte_exact() {
    let context = nine_object_context();
    let mut writer = PdfWriter::for_context(&context, uncompressed());
    let bytes = writer.serialize_to_buffer().await.unwrap();
    assert_eq!(writer.phase(), WriterPhase::Done);

    let mut expected = Vec::new();
    expected.extend_from_slice(b"%PDF-1.7\n%\x81\x81\x81\x81\n\n");
    expected.extend_from_slice(
        b"10 0 obj\n<<\n/Type /ObjStm\n/N 9\n/First 42\n/Length 108\n>>\nstream\n\
          1 0 2 4 3 9 4 15 5 24 6 31 7 39 8 44 9 47 \
          [ ]\ntrue\n<<\n>>\n<ABC123>\n21 0 R\n/QuxBaz\nnull\n21\n(Stuff and thingz)\n\
          \nendstream\nendobj\n\n",
    );
    expected.extend_from_slice(
        b"11 0 obj\n<<\n/Size 12\n/Root 3 0 R\n/Type /XRef\n/W [ 1 1 2 ]\n/Index [ 0 12 ]\n/Length 48\n>>\nstream\n",
    );
    expected.extend_from_slice(&[0x00, 0x00, 0xFF, 0xFF]);
    for index in 0..9u8 {
        expected.extend_from_slice(&[0x02, 0x0A, 0x00, index]);
    }
    expected.extend_from_slice(&[0x01, 0x10, 0x00, 0x00]);
    expected.extend_from_slice(&[0x01, 0xCE, 0x00, 0x00]);
    expected.extend_from_slice(b"\nendstream\nendobj\n\nstartxref\n206\n%%EOF");

    assert_eq!(bytes.len(), 387);
    assert_eq!(bytes, expected);
}

#[tokio::test]
async fn test_compressed_object_stream_inflates_to_payload() {
    let context = nine_object_context();
    let bytes = PdfWriter::for_context(&context, WriterConfig::default())
        .serialize_to_buffer()
        .await
        .unwrap();

    let marker = b"stream\n";
    let start = bytes
        .windows(marker.len())
        .position(|window| window == marker)
        .unwrap()
        + marker.len();
    let end = start
        + bytes[start..]
            .windows(b"\nendstream".len())
            .position(|window| window == b"\nendstream")
            .unwrap();

    let mut payload = Vec::new();
    ZlibDecoder::new(&bytes[start..end])
        .read_to_end(&mut payload)
        .unwrap();
    assert!(payload.starts_with(b"1 0 2 4 3 9 4 15 5 24 6 31 7 39 8 44 9 47 [ ]\ntrue\n"));

    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("<<\n/Filter /FlateDecode\n/Type /ObjStm\n/N 9\n/First 42\n"));
    assert!(text.contains("/Index [ 0 12 ]\n/Filter /FlateDecode\n"));
}

#[tokio::test]
async fn test_classic_output_lists_every_object() {
    let context = nine_object_context();
    let bytes = PdfWriter::for_context(&context, WriterConfig::classic())
        .serialize_to_buffer()
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("1 0 obj\n[ ]\nendobj\n\n2 0 obj\ntrue\nendobj\n\n"));
    assert!(text.contains("xref\n0 10\n0000000000 65535 f \n0000000016 00000 n \n"));
    assert!(text.contains("trailer\n<<\n/Size 10\n/Root 3 0 R\n>>\n\nstartxref\n"));
    assert!(!text.contains("/ObjStm"));

    let startxref = text.rfind("startxref\n").unwrap();
    let offset: usize = text[startxref + 10..text.len() - "\n%%EOF".len()]
        .parse()
        .unwrap();
    assert!(bytes[offset..].starts_with(b"xref\n"));
}

#[tokio::test]
async fn test_classic_offsets_point_at_objects() {
    let context = nine_object_context();
    let bytes = PdfWriter::for_context(&context, WriterConfig::classic())
        .serialize_to_buffer()
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let xref = text.find("xref\n0 10\n").unwrap() + "xref\n0 10\n".len();
    let lines: Vec<&str> = text[xref..].lines().skip(1).take(9).collect();
    for (index, line) in lines.iter().enumerate() {
        let offset: usize = line[..10].parse().unwrap();
        assert!(
            bytes[offset..].starts_with(format!("{} 0 obj\n", index + 1).as_bytes()),
            "entry {} points at {offset}",
            index + 1
        );
    }
}

#[tokio::test]
async fn test_encrypted_compacted_document() {
    init_tracing();
    let mut context = nine_object_context();
    context.trailer_info_mut().id = Some((vec![0], vec![0]));
    context.encrypt(&SecurityOptions::new("password")).unwrap();
    let encrypt = context.trailer_info().encrypt.unwrap();
    assert_eq!(encrypt, ObjectId::of(10));

    let key = context.security().unwrap().encryption_key().clone();
    let session = EncryptionSession::with_iv_source(key, FixedIv([0; 16]));
    let bytes = PdfWriter::for_context(&context, uncompressed())
        .with_encryption_session(session)
        .unwrap()
        .serialize_to_buffer()
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes);

    // Root and Encrypt are written directly; the encryption dictionary
    // stays readable.
    assert!(text.contains("3 0 obj\n<<\n>>\nendobj"));
    assert!(text.contains("10 0 obj\n<<\n/Filter /Standard\n/V 4\n"));
    // The group holding the other eight objects is encrypted as a whole.
    assert!(text.contains("11 0 obj\n<<\n/Type /ObjStm\n/N 8\n"));
    assert!(!text.contains("Stuff and thingz"));
    assert!(text.contains("12 0 obj\n<<\n/Size 13\n/Root 3 0 R\n/Encrypt 10 0 R\n/ID [ <00> <00> ]\n/Type /XRef\n"));
}

#[tokio::test]
async fn test_stream_contents_are_encrypted() {
    let mut context = PdfContext::new();
    let stream = context.register(RawStream::new(Dictionary::new(), b"foobar".to_vec()));
    context.trailer_info_mut().root = Some(stream);
    context.trailer_info_mut().id = Some((vec![0], vec![0]));
    context.encrypt(&SecurityOptions::new("password")).unwrap();

    let key = context.security().unwrap().encryption_key().clone();
    let bytes = PdfWriter::for_context(&context, WriterConfig::classic())
        .with_encryption_session(EncryptionSession::with_iv_source(key, FixedIv([1; 16])))
        .unwrap()
        .serialize_to_buffer()
        .await
        .unwrap();

    let mut expected = b"1 0 obj\n<<\n/Length 32\n>>\nstream\n".to_vec();
    expected.extend_from_slice(&[1; 16]);
    expected.extend_from_slice(&[
        38, 29, 41, 169, 172, 186, 178, 41, 7, 206, 213, 110, 253, 220, 184, 99,
    ]);
    expected.extend_from_slice(b"\nendstream\nendobj");
    assert!(bytes.windows(expected.len()).any(|window| window == expected));
}

#[tokio::test]
async fn test_random_ivs_still_size_correctly() {
    let mut context = nine_object_context();
    context.encrypt(&SecurityOptions::new("password")).unwrap();

    for config in [WriterConfig::default(), WriterConfig::classic()] {
        let bytes = PdfWriter::for_context(&context, config)
            .serialize_to_buffer()
            .await
            .unwrap();
        assert!(bytes.ends_with(b"%%EOF"));
    }
}

/// Background task counting how often it gets scheduled. On a
/// current-thread runtime it only runs while the test task is yielding.
fn spawn_yield_counter() -> (Arc<AtomicUsize>, tokio::task::JoinHandle<()>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let handle = tokio::spawn({
        let counter = Arc::clone(&counter);
        async move {
            loop {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        }
    });
    (counter, handle)
}

#[tokio::test(flavor = "current_thread")]
async fn test_yields_with_small_tick() {
    init_tracing();
    let mut context = PdfContext::new();
    for i in 0..500 {
        let mut dict = Dictionary::new();
        dict.set("Index", i);
        context.register(dict);
    }
    context.register(RawStream::new(Dictionary::new(), vec![0; 64]));

    let (counter, handle) = spawn_yield_counter();
    let config = WriterConfig::default()
        .with_objects_per_tick(3)
        .with_objects_per_stream(7);
    let bytes = PdfWriter::for_context(&context, config)
        .serialize_to_buffer()
        .await
        .unwrap();
    assert!(counter.load(Ordering::SeqCst) > 0);
    handle.abort();

    let text = String::from_utf8_lossy(&bytes);
    // 500 grouped objects in 72 streams, the raw stream, then the xref stream.
    assert!(text.contains("574 0 obj\n"));
    assert!(text.contains("/Size 575\n"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_yield_count_follows_tick_size() {
    let (counter, handle) = spawn_yield_counter();

    let context = nine_object_context();
    let config = WriterConfig::classic().with_objects_per_tick(1);
    PdfWriter::for_context(&context, config)
        .serialize_to_buffer()
        .await
        .unwrap();
    let after_small_tick = counter.load(Ordering::SeqCst);
    assert!(after_small_tick > 0);

    // Nine objects never reach a boundary of fifty.
    let config = WriterConfig::classic().with_objects_per_tick(50);
    PdfWriter::for_context(&context, config)
        .serialize_to_buffer()
        .await
        .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), after_small_tick);
    handle.abort();
}

#[tokio::test]
async fn test_serialize_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nine.pdf");
    let context = nine_object_context();

    let mut file = fs::File::create(&path).unwrap();
    let written = PdfWriter::for_context(&context, uncompressed())
        .serialize_to_writer(&mut file)
        .await
        .unwrap();
    drop(file);

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(written, 387);
    assert_eq!(on_disk.len(), written);
    assert!(on_disk.starts_with(b"%PDF-1.7\n"));
}

#[tokio::test]
async fn test_empty_registry() {
    let context = PdfContext::new();
    let bytes = PdfWriter::for_context(&context, WriterConfig::classic())
        .serialize_to_buffer()
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&bytes[16..]),
        "xref\n0 1\n0000000000 65535 f \n\ntrailer\n<<\n/Size 1\n>>\n\nstartxref\n16\n%%EOF"
    );

    let bytes = PdfWriter::for_context(&context, uncompressed())
        .serialize_to_buffer()
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes)
        .contains("1 0 obj\n<<\n/Size 2\n/Type /XRef\n/W [ 1 1 2 ]\n/Index [ 0 2 ]\n"));
}

#[tokio::test]
async fn test_writer_rejects_second_run() {
    let context = nine_object_context();
    let mut writer = PdfWriter::for_context(&context, WriterConfig::default());
    writer.serialize_to_buffer().await.unwrap();
    assert!(matches!(
        writer.serialize_to_buffer().await,
        Err(PdfError::InvalidStructure(_))
    ));
}
