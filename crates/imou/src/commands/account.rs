//! Login command handler.

use imou_api::ImouClient;
use serde::Serialize;

use crate::error::CliError;
use crate::output::Printer;

#[derive(Serialize)]
struct LoginReport {
    app_id: String,
    data_center: String,
    connected: bool,
}

pub async fn login(client: &ImouClient, out: &Printer) -> Result<(), CliError> {
    client.login().await?;

    let report = LoginReport {
        app_id: client.credentials().app_id.clone(),
        data_center: client.credentials().data_center.to_string(),
        connected: client.is_connected(),
    };
    out.item(
        &report,
        |r| format!("Logged in as {} ({})", r.app_id, r.data_center),
        |r| r.app_id.clone(),
    )
}
