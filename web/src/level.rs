use gloo::net::http::Request;
use minimines_core::{GameConfig, LevelConfig};

const LEVEL_URL: &str = "level.json";

/// Fetches `level.json` and merges it over the built-in defaults. Every
/// failure path (missing file, transport error, bad JSON) keeps the defaults;
/// the level file can never break startup.
pub(crate) async fn load_level() -> GameConfig {
    let mut config = GameConfig::default();

    match Request::get(LEVEL_URL).send().await {
        Ok(resp) if resp.ok() => match resp.text().await {
            Ok(body) => match serde_json::from_str::<LevelConfig>(&body) {
                Ok(level) => {
                    log::debug!("level loaded: {:?}", level);
                    config.apply_level(&level);
                }
                Err(err) => log::warn!("level.json is not valid, using defaults: {}", err),
            },
            Err(err) => log::warn!("could not read level.json body, using defaults: {}", err),
        },
        Ok(resp) => log::warn!(
            "level.json fetch returned {}, using defaults",
            resp.status()
        ),
        Err(err) => log::warn!("level.json fetch failed, using defaults: {}", err),
    }

    config
}
