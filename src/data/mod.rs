pub mod dataset;
pub mod describe;
pub mod source;
pub mod split;

pub use dataset::Dataset;
pub use describe::{describe, ColumnSummary, DatasetSummary};
pub use source::{CaliforniaHousing, DatasetProvider, InMemorySource, SourceFormat};
pub use split::{train_test_split, Split, SPLIT_SEED, TEST_FRACTION};
