//! Process environment for the social backend, read once at startup into
//! the global `ENV` static. Missing required keys abort before the server
//! binds.

pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

fn required(key: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| panic!("{key} must be set in .env file or environment variable"))
}

fn string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

impl Env {
    fn new() -> Self {
        Env {
            jwt_secret: required("SECRET_KEY"),
            // Access tokens live 15 minutes, refresh sessions a week.
            access_token_expiration: parsed_or("ACCESS_TOKEN_EXPIRATION", 900),
            refresh_token_expiration: parsed_or("REFRESH_TOKEN_EXPIRATION", 604_800),
            database_url: required("DATABASE_URL"),
            redis_url: required("REDIS_URL"),
            frontend_url: string_or("FRONTEND_URL", "http://localhost:5173"),
            ip: string_or("IP", "127.0.0.1"),
            port: parsed_or("PORT", 8080),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_knobs_fall_back_to_defaults() {
        assert_eq!(parsed_or("SOCIALNET_UNSET_PORT", 8080u16), 8080);
        assert_eq!(parsed_or("SOCIALNET_UNSET_EXPIRATION", 900u64), 900);
        assert_eq!(string_or("SOCIALNET_UNSET_IP", "127.0.0.1"), "127.0.0.1");
    }
}
