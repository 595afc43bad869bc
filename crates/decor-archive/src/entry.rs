use crate::format::ArchiveKind;

/// Bytes of one archive member, handed to a reader through a temp file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub name: String,
    pub data: Vec<u8>,
}

impl Payload {
    /// Returns `None` for empty members; those never reach a reader.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            data,
        })
    }

    pub fn size(&self) -> usize { self.data.len() }

    pub fn as_bytes(&self) -> &[u8] { &self.data }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SniffOutcome {
    /// At least one payload, in extraction order.
    Payloads(Vec<Payload>),
    /// Nothing to replay: not an archive, empty, or unreadable as one.
    NoPayloads,
    /// The container asked not to be unpacked.
    OptOut,
}

impl SniffOutcome {
    pub(crate) fn from_payloads(payloads: Vec<Payload>) -> Self {
        if payloads.is_empty() {
            Self::NoPayloads
        } else {
            Self::Payloads(payloads)
        }
    }

    pub fn payload_count(&self) -> usize {
        match self {
            Self::Payloads(p) => p.len(),
            Self::NoPayloads | Self::OptOut => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sniffed {
    pub kind:    ArchiveKind,
    pub outcome: SniffOutcome,
}

impl Sniffed {
    pub(crate) fn plain() -> Self {
        Self {
            kind:    ArchiveKind::NotAnArchive,
            outcome: SniffOutcome::NoPayloads,
        }
    }

    /// Payloads to replay, or `None` when the reader should see the original path.
    pub fn into_payloads(self) -> Option<Vec<Payload>> {
        match self.outcome {
            SniffOutcome::Payloads(p) => Some(p),
            SniffOutcome::NoPayloads | SniffOutcome::OptOut => None,
        }
    }
}
