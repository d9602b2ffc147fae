/// Options for one serialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Pack eligible objects into object streams and finish with a
    /// cross-reference stream instead of a classic `xref` table.
    pub use_object_streams: bool,
    /// Deflate object streams and the cross-reference stream.
    pub compress_streams: bool,
    /// Maximum number of objects per object stream.
    pub objects_per_stream: usize,
    /// Yield to the scheduler after this many objects have been sized.
    pub objects_per_tick: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            use_object_streams: true,
            compress_streams: true,
            objects_per_stream: 50,
            objects_per_tick: 50,
        }
    }
}

impl WriterConfig {
    /// Flat layout: every object written directly, classic `xref` table.
    pub fn classic() -> Self {
        Self {
            use_object_streams: false,
            ..Self::default()
        }
    }

    pub fn with_object_streams(mut self, enabled: bool) -> Self {
        self.use_object_streams = enabled;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress_streams = enabled;
        self
    }

    pub fn with_objects_per_stream(mut self, count: usize) -> Self {
        self.objects_per_stream = count;
        self
    }

    pub fn with_objects_per_tick(mut self, count: usize) -> Self {
        self.objects_per_tick = count;
        self
    }
}
