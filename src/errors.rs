error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
    }

    errors {
        InvalidAlphabet(base: char) {
            description("sequence contains an invalid character")
            display("invalid base {:?}; expected A, C, G, U (or T)", base)
        }

        InvalidLength(len: usize) {
            description("guide length out of range")
            display("guide must be 19-23 nt, got {} nt", len)
        }

        IndexNotReady {
            description("seed index has not been committed")
            display("seed index is not ready; build and commit it first")
        }

        IndexCorrupt(msg: String) {
            description("seed index failed validation")
            display("seed index is corrupt: {}", msg)
        }

        TranscriptMissing(id: String) {
            description("seed entry references an unknown transcript")
            display("unknown transcript {:?} referenced by seed index", id)
        }

        LengthMismatch(guide: usize, target: usize) {
            description("guide and target window lengths differ")
            display("guide ({} nt) and target window ({} nt) differ in length", guide, target)
        }

        Cancelled {
            description("analysis cancelled")
            display("analysis cancelled before completion")
        }

        ResourceExhausted(candidates: usize, limit: usize) {
            description("candidate limit exceeded")
            display("{} candidates exceed the configured limit of {}", candidates, limit)
        }
    }
}

impl ErrorKind {
    /// Stable code string surfaced to the hosting layer.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidAlphabet(_) => "InvalidAlphabet",
            ErrorKind::InvalidLength(_) => "InvalidLength",
            ErrorKind::IndexNotReady => "IndexNotReady",
            ErrorKind::IndexCorrupt(_) => "IndexCorrupt",
            ErrorKind::TranscriptMissing(_) => "TranscriptMissing",
            ErrorKind::LengthMismatch(_, _) => "LengthMismatch",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::ResourceExhausted(_, _) => "ResourceExhausted",
            _ => "Internal",
        }
    }
}
