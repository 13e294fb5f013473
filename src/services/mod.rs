pub mod droid;
pub mod job_count;
pub mod linkedin_scraper;
pub mod login_wall;
pub mod navigator;

pub use droid::*;
pub use job_count::*;
pub use linkedin_scraper::*;
pub use login_wall::*;
pub use navigator::*;
