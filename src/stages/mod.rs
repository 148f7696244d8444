pub mod stage0_flatten;
pub mod stage1_annotate;
pub mod stage2_summarize;
pub mod stage3_report;

pub use stage0_flatten::*;
pub use stage1_annotate::*;
pub use stage2_summarize::*;
pub use stage3_report::*;
