use azure_log_forwarder::app;

#[tokio::main]
async fn main() -> Result<(), azure_log_forwarder::AppError> {
    app::run().await
}
