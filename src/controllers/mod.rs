pub mod paging;
pub mod song;
pub use song::SongController;
