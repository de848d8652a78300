pub mod raw;
pub mod resume;

pub use raw::RawResume;
pub use resume::{
    Certification, Education, Employer, EmploymentHistory, PersonalDetails, Project, ResumeRecord,
    Role, Skills, NOT_SPECIFIED,
};
