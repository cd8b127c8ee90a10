//! Terminal output for the `critic` commands
//!
//! Uses `cliclack` for styled logs and spinners when attached to a terminal,
//! and plain `[OK]` / `[WARN]` lines otherwise (CI, pipes, log files).
//!
//! # Example
//!
//! ```rust,ignore
//! use critic::ui::{self, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::intro(&ctx, "Critic Review");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Reviewing octo/demo...");
//! // ... run the review ...
//! spinner.stop("Reviewed 12 files");
//!
//! ui::key_value(&ctx, "Repository", "abc123");
//! ui::outro_success(&ctx, "Done");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, note, outro_success, outro_warn, remark, section,
    step_error_detail, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::TaskSpinner;
