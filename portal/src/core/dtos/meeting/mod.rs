pub mod create_meeting_dto;
pub mod meeting_filter_dto;
pub mod update_meeting_dto;
