pub mod checkin;
pub mod donation;
pub mod lottery;
pub mod participants;
pub mod session;
pub mod sheet;
pub mod sync;

pub use checkin::handle_checkin_command;
pub use donation::handle_donation_command;
pub use lottery::handle_lottery_command;
pub use participants::{handle_participant_command, ParticipantCommands};
pub use session::{handle_login_command, handle_logout_command, handle_status_command};
pub use sheet::{handle_export_command, handle_import_command};
pub use sync::handle_sync_command;
