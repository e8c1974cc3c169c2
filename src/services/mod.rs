pub mod course_allocation;
pub mod section_allocator;
pub mod subject_directory;
pub mod teacher_directory;

pub use course_allocation::CourseAllocationManager;
pub use section_allocator::SectionAllocator;
pub use subject_directory::SubjectDirectory;
pub use teacher_directory::{TeacherDefaults, TeacherDirectory};
