//! Page URL parameters

/// Avatar name from the `?avatar=` parameter, if present
pub fn avatar_param() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location().href().ok()?;
    let url = web_sys::Url::new(&location).ok()?;
    let avatar = url.search_params().get("avatar")?;

    let avatar = avatar.trim();
    if avatar.is_empty() {
        return None;
    }
    tracing::info!("Avatar from URL parameter: {}", avatar);
    Some(avatar.to_string())
}
