//! Login, register and logout.

use std::io::Write;

use anyhow::{Context, Result};
use droplink_client::ApiClient;

use super::LoginArgs;

pub async fn login(api: &ApiClient, args: LoginArgs) -> Result<()> {
    let password = resolve_password(args.password)?;
    let grant = api.login(&args.email, &password).await?;
    println!("Signed in as {} ({:?})", grant.email, grant.role);
    Ok(())
}

pub async fn register(api: &ApiClient, args: LoginArgs) -> Result<()> {
    let password = resolve_password(args.password)?;
    let grant = api.register(&args.email, &password).await?;
    println!("Account created, signed in as {}", grant.email);
    Ok(())
}

pub fn logout(api: &ApiClient) -> Result<()> {
    api.session().clear()?;
    println!("Signed out");
    Ok(())
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
