pub mod chat;
pub mod message;
pub mod trackers;
pub mod voice;
pub mod workout;

pub use chat::ChatView;
pub use message::ChatMessageView;
pub use trackers::TrackersView;
pub use voice::VoiceButton;
pub use workout::WorkoutPanel;
