use chrono::NaiveTime;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Payroll knobs
    /// Check-ins after this time-of-day count as late (HH:MM).
    pub late_arrival_grace: NaiveTime,
    /// Overtime threshold per working day, in hours.
    pub standard_daily_hours: Decimal,
    /// Every N late arrivals forfeit half a day's pay.
    pub late_arrivals_per_half_day: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .expect("ACCESS_TOKEN_TTL must be a number"),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .expect("REFRESH_TOKEN_TTL must be a number"),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LOGIN_PER_MIN must be a number"),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("RATE_REGISTER_PER_MIN must be a number"),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("RATE_REFRESH_PER_MIN must be a number"),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_PROTECTED_PER_MIN must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            late_arrival_grace: NaiveTime::parse_from_str(
                &env::var("LATE_ARRIVAL_GRACE").unwrap_or_else(|_| "09:15".to_string()),
                "%H:%M",
            )
            .expect("LATE_ARRIVAL_GRACE must be HH:MM"),
            standard_daily_hours: env::var("STANDARD_DAILY_HOURS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("STANDARD_DAILY_HOURS must be a number"),
            late_arrivals_per_half_day: env::var("LATE_ARRIVALS_PER_HALF_DAY")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("LATE_ARRIVALS_PER_HALF_DAY must be a number"),
        }
    }
}
