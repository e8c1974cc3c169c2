use clap::Parser;
use once_cell::sync::Lazy;

use crate::services::TeacherDefaults;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value_t = 86400)]
    pub jwt_expiry_seconds: i64,

    #[clap(long, env, default_value = "principal@test.com")]
    pub principal_email: String,

    #[clap(long, env)]
    pub principal_password: String,

    #[clap(long, env, default_value = "passer123")]
    pub default_teacher_password: String,

    #[clap(long, env, default_value = "gmail.com")]
    pub teacher_email_domain: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

impl Config {
    pub fn teacher_defaults(&self) -> TeacherDefaults {
        TeacherDefaults {
            default_password: self.default_teacher_password.clone(),
            email_domain: self.teacher_email_domain.clone(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}
