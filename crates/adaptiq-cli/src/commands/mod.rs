pub mod history;
pub mod init;
pub mod leaderboard;
pub mod report;
pub mod run;
pub mod validate;
