use dialoguer::Password;
use gala_core::{App, GalaError, Result, Role};

pub async fn handle_login_command(
    app: &mut App,
    role: &str,
    password: Option<String>,
) -> Result<()> {
    let role = Role::parse(role)
        .ok_or_else(|| GalaError::config(format!("unknown role '{}', try hostess or admin", role)))?;

    let password = if let Some(p) = password {
        p
    } else {
        Password::new()
            .with_prompt(format!("Password for {}", role))
            .interact()
            .map_err(|e| GalaError::internal(e.to_string()))?
    };

    app.login(role, &password).await?;
    println!("Logged in as {}", role);

    // pull a fresh roster right away so the device is usable offline
    match app.sync().await {
        Ok(count) => println!("Synced {} participants", count),
        Err(e) => println!("Warning: initial sync failed ({}), using cached data", e),
    }

    Ok(())
}

pub async fn handle_logout_command(app: &mut App) -> Result<()> {
    app.logout().await?;
    println!("Logged out");
    Ok(())
}

pub async fn handle_status_command(app: &mut App) -> Result<()> {
    match app.current_role() {
        Some(role) => println!("Logged in as: {}", role),
        None => println!("Not logged in"),
    }

    let cached = app.load_cached().await?;
    println!("Cached participants: {}", cached);

    match app.last_sync().await? {
        Some(at) => println!("Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last sync: never"),
    }

    if app.api().test_connection().await {
        println!("Registration service: online");
    } else {
        println!("Registration service: offline");
    }

    Ok(())
}
