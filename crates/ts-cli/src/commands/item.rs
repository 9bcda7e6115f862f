//! `ts item` command implementation

use crate::api::defaults;
use crate::error::Result;

/// Fetch an item and print it as JSON
pub async fn run(item_id: i64, q: Option<String>) -> Result<()> {
    let item = defaults::shared()?.get_item(item_id, q.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
