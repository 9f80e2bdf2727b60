use rediskv_client::{Client, Result, DEFAULT_PORT};
use std::env;

/// Demonstration of the five client operations
///
/// Connects to a Redis-compatible server (address taken from
/// `REDISKV_HOST` / `REDISKV_PORT`, defaulting to localhost) and runs
/// through scalar values, namespaces, and set members.

fn main() -> Result<()> {
    env_logger::init();

    let host = env::var("REDISKV_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("REDISKV_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    println!("connecting to {host}:{port}");
    let mut client = Client::connect(host, port)?;

    // Scalar values in the root key space.
    client.set_value("0", "1")?;
    println!("value for 0 is {}", client.get_value("0")?);

    // The same key in two namespaces holds two independent values.
    client.set_value_in_namespace("0", "1", "first")?;
    client.set_value_in_namespace("0", "2", "second")?;
    println!("first:0  = {}", client.get_value_in_namespace("0", "first")?);
    println!("second:0 = {}", client.get_value_in_namespace("0", "second")?);
    println!("third:0  = {:?} (never set)", client.get_value_in_namespace("0", "third")?);

    // Unordered set members; re-adding an existing member is a no-op.
    client.remove_key("fruit")?;
    client.add_member("fruit", "apple")?;
    client.add_member("fruit", "pear")?;
    client.add_member("fruit", "orange")?;
    client.add_member("fruit", "apple")?;
    println!("fruit = {:?}", client.get_members("fruit")?);

    // Cleanup.
    client.remove_key("fruit")?;
    client.remove_key("0")?;
    client.remove_key_in_namespace("0", "first")?;
    client.remove_key_in_namespace("0", "second")?;

    Ok(())
}
