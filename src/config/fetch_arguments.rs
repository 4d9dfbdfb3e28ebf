use crate::config::config::{Config, ConfigError, HardwareKind};

use log::LevelFilter;
use std::env;
use std::time::Duration;

pub fn fetch_command_line_arguments() -> Result<Config, ConfigError> {
    parse_arguments(env::args().skip(1))
}

/// Parses `key=value` arguments on top of the default configuration.
pub fn parse_arguments<I, S>(arguments: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = Config::default();

    for argument in arguments {
        let argument = argument.as_ref();
        let (key, value) = argument
            .split_once('=')
            .ok_or_else(|| ConfigError::UnknownArgument(argument.to_string()))?;
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "host" => config.host = value.to_string(),
            "port" => config.port = value.parse::<u16>().map_err(|_| invalid())?,
            "hardware" => config.hardware = HardwareKind::from_name(value).ok_or_else(invalid)?,
            "drive_power" => config.profile.drive_power = parse_power(value).ok_or_else(invalid)?,
            "search_power" => config.profile.search_power = parse_power(value).ok_or_else(invalid)?,
            "search_timeout" => {
                let seconds = value.parse::<f64>().map_err(|_| invalid())?;
                config.profile.search_timeout =
                    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())?;
            }
            "poll_interval" => {
                let millis = value.parse::<u64>().map_err(|_| invalid())?;
                if millis == 0 {
                    return Err(invalid());
                }
                config.profile.poll_interval = Duration::from_millis(millis);
            }
            "sysfs_root" => config.sysfs_root = value.to_string(),
            "log" => config.log_level = value.parse::<LevelFilter>().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownArgument(argument.to_string())),
        }
    }

    Ok(config)
}

fn parse_power(value: &str) -> Option<i8> {
    value.parse::<i8>().ok().filter(|power| (1..=100).contains(power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config;

    #[test]
    fn no_arguments_gives_defaults() {
        let config = parse_arguments(Vec::<String>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.address(), "0.0.0.0:8000");
        assert_eq!(config.profile.drive_power, config::DRIVE_POWER);
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse_arguments([
            "port=9000",
            "hardware=sim",
            "drive_power=60",
            "search_power=40",
            "search_timeout=2.5",
            "poll_interval=20",
            "log=debug",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.hardware, HardwareKind::Sim);
        assert_eq!(config.profile.drive_power, 60);
        assert_eq!(config.profile.search_power, 40);
        assert_eq!(config.profile.search_timeout, Duration::from_millis(2500));
        assert_eq!(config.profile.poll_interval, Duration::from_millis(20));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_out_of_range_power() {
        let error = parse_arguments(["drive_power=120"]).unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                key: "drive_power".to_string(),
                value: "120".to_string()
            }
        );
        assert!(parse_arguments(["search_power=0"]).is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(
            parse_arguments(["speed=fast"]).unwrap_err(),
            ConfigError::UnknownArgument("speed=fast".to_string())
        );
        assert!(parse_arguments(["verbose"]).is_err());
    }
}
