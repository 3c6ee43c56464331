use anyhow::{Result, anyhow, bail};

use crate::core::AppConfig;
use crate::status::{ConnectionState, check_database_status, test_connectivity};
use crate::supabase::SupabaseClient;

pub async fn run(config: AppConfig) -> Result<()> {
    let client = SupabaseClient::from_config(&config);
    let status = check_database_status(&config, &client).await;

    println!(
        "Configuration: {}",
        if status.configured { "Configured" } else { "Not Configured" }
    );
    let connection = match status.connection {
        ConnectionState::Connected => "Connected",
        ConnectionState::Failed => "Failed",
        ConnectionState::Checking => "Checking",
    };
    println!("Connection:    {}", connection);
    if let Some(error) = &status.error {
        println!("\n{}\n", error);
    }

    if !status.policies.is_empty() {
        println!("\nRow Level Security");
        for policy in &status.policies {
            println!(
                "  {:<40} {:<9} {} policies",
                policy.table_name,
                if policy.rls_enabled { "Enabled" } else { "Disabled" },
                policy.policy_count
            );
        }
    }

    println!("\nCORS");
    println!("  Allowed origins: {}", status.cors.allowed_origins);
    println!("  Allowed methods: {}", status.cors.allowed_methods);
    println!("  Allowed headers: {}", status.cors.allowed_headers);
    println!("  Max age:         {}s", status.cors.max_age_secs);

    Ok(())
}

pub async fn test_connection(config: AppConfig) -> Result<()> {
    let configured = config.is_configured();
    println!(
        "Configuration Status: {}",
        if configured { "Configured" } else { "Not Configured" }
    );

    if !configured {
        bail!(
            "Environment variables are missing:\n   - HRDESK_SUPABASE_URL\n   - HRDESK_SUPABASE_ANON_KEY"
        );
    }

    println!("Testing connection...");
    let client = SupabaseClient::from_config(&config);
    test_connectivity(&client)
        .await
        .map_err(|message| anyhow!("Connection failed:\n{}", message))?;
    println!("Connection successful!");
    Ok(())
}
