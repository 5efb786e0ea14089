pub mod upload_rows_dto;
