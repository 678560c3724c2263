pub const SEED_LEN: usize = 7;

pub const SEED_KEY_COUNT: usize = 1 << (2 * SEED_LEN);

pub const GUIDE_MIN_LEN: usize = 19;
pub const GUIDE_MAX_LEN: usize = 23;

pub const INDEX_HEADER: &[u8] = b"RIScan";
pub const INDEX_VERSION: u8 = 1;
pub const INDEX_EXTENSION: &str = ".riscan";

// Index flag indicating that the build was restricted to annotated 3' UTRs
pub const FLAG_UTR_ONLY: u64 = 0b1;

pub const MAX_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_CANDIDATES: usize = 50_000;

// Context windows: 61 bases around the site midpoint for AU content,
// 21 bases around the seed for the accessibility proxy
pub const AU_WINDOW_RADIUS: usize = 30;
pub const ACCESS_WINDOW_RADIUS: usize = 10;
