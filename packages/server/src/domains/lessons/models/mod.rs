mod lesson;

pub use lesson::{
    Comment, FavoriteEntry, LessonFilter, LessonRecord, LessonSort, NewLesson,
};
