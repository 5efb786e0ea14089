pub mod analytics_response;
pub mod auth_response;
pub mod meeting_response;
pub mod statistics_response;
pub mod upload_response;
pub mod user_response;

/// Implements `Writer` and `EndpointOutRegister` for a response rendered as JSON
/// with a fixed status code.
#[macro_export]
macro_rules! impl_json_writer {
    ($type:ty, $status:expr, $description:literal) => {
        #[salvo::async_trait]
        impl salvo::Writer for $type {
            async fn write(
                self,
                _req: &mut salvo::Request,
                _depot: &mut salvo::Depot,
                res: &mut salvo::Response,
            ) {
                res.status_code($status);
                res.render(salvo::writing::Json(self));
            }
        }

        impl salvo::oapi::EndpointOutRegister for $type {
            fn register(
                components: &mut salvo::oapi::Components,
                operation: &mut salvo::oapi::Operation,
            ) {
                operation.responses.insert(
                    $status.as_str(),
                    salvo::oapi::Response::new($description).add_content(
                        "application/json",
                        <$type as salvo::oapi::ToSchema>::to_schema(components),
                    ),
                );
            }
        }
    };
}
