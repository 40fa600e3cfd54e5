//! Account commands: login, registration, logout and profile.

use secrecy::{ExposeSecret, SecretString};
use wonderland_client::Storefront;
use wonderland_client::api::ProfileUpdate;
use wonderland_core::validation::RegistrationForm;

use super::{CommandError, secret_or_prompt};
use crate::render;

/// # Errors
///
/// Validation errors or the backend's rejection.
pub async fn login(
    shop: &mut Storefront,
    email: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    let password = secret_or_prompt(password, "Password: ")?;
    let session = shop.auth.login(email, &password).await?;
    render::welcome(session);
    Ok(())
}

/// # Errors
///
/// Validation errors (checked before anything is sent) or the backend's
/// rejection.
pub async fn register(
    shop: &mut Storefront,
    name: &str,
    email: &str,
    password: Option<String>,
    confirm_password: Option<String>,
) -> Result<(), CommandError> {
    let prompted = password.is_none();
    let password = secret_or_prompt(password, "Password: ")?;
    let confirm = match confirm_password {
        Some(confirm) => confirm.into(),
        None if prompted => secret_or_prompt(None, "Confirm password: ")?,
        None => SecretString::from(password.expose_secret()),
    };

    let form = RegistrationForm {
        name,
        email,
        password: password.expose_secret(),
        confirm_password: confirm.expose_secret(),
    };
    let session = shop.auth.register(&form).await?;
    render::welcome(session);
    Ok(())
}

pub fn logout(shop: &mut Storefront) {
    shop.auth.logout();
    render::message("Logged out.");
}

/// # Errors
///
/// `LoginRequired` without a session.
pub fn whoami(shop: &Storefront) -> Result<(), CommandError> {
    let session = shop.auth.session().ok_or(CommandError::LoginRequired)?;
    render::session(session);
    Ok(())
}

/// # Errors
///
/// `LoginRequired` without a session, otherwise validation errors or the
/// backend's rejection.
pub async fn update_profile(
    shop: &mut Storefront,
    name: Option<String>,
    email: Option<String>,
) -> Result<(), CommandError> {
    if !shop.auth.is_authenticated() {
        return Err(CommandError::LoginRequired);
    }
    let user = shop.auth.update_profile(ProfileUpdate { name, email }).await?;
    render::user(user);
    Ok(())
}
