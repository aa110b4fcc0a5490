pub mod envelope;
pub mod exercise;
pub mod magic_link;
pub mod post;
pub mod routine;
pub mod user;
pub mod workout_record;

pub use envelope::{ApiResponse, PageQuery, Paginated, Success};
pub use exercise::{CreateExerciseRequest, Exercise, UpdateExerciseRequest};
pub use magic_link::{AuthResponse, LinkSent, MagicLink, MagicLinkRequest, VerifyQuery};
pub use post::{
    Comment, CreateCommentRequest, CreatePostRequest, Post, PostDetail, UpdateCommentRequest,
    UpdatePostRequest,
};
pub use routine::{CreateRoutineRequest, Routine, RoutineDetail, UpdateRoutineRequest};
pub use user::{UpdateProfileRequest, User, UserSummary};
pub use workout_record::{
    CompletedExercise, CreateWorkoutRecordRequest, WorkoutRecord, WorkoutRecordDetail,
};
