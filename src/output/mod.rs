pub mod page;

pub use page::{PageOptions, render_page, write_page};
