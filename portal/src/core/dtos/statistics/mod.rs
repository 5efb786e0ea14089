pub mod statistics_query_dto;
