pub mod job;
pub mod resume;

pub use job::JobData;
pub use resume::{Bullet, ContactInfo, Education, Experience, Project, ResumeContent, Skills, WhyFitPoint};
