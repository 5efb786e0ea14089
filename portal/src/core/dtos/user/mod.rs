pub mod create_user_dto;
