// src/core/docker.rs

use crate::{constants::DEFAULT_COMPOSE_FILE, core::commons::posix_quote, models::DockerDef};

/// Builds the `docker compose ... up -d` line for the `:up` built-in.
///
/// `@group` arguments expand to the services listed under that group. An
/// unknown group is passed through literally.
pub fn compose_up(docker: &DockerDef, args: &[String]) -> String {
    let compose_file = match docker.compose_file.trim() {
        "" => DEFAULT_COMPOSE_FILE,
        file => file,
    };

    let mut services: Vec<&str> = Vec::new();
    for arg in args {
        match arg.strip_prefix('@') {
            Some(group) => match docker.groups.get(group) {
                Some(members) => services.extend(members.iter().map(String::as_str)),
                None => {
                    log::warn!("Unknown docker group '{}', passing it through as-is.", arg);
                    services.push(arg);
                }
            },
            None => services.push(arg),
        }
    }

    let mut line = format!("docker compose -f {} up -d", posix_quote(compose_file));
    for service in services {
        line.push(' ');
        line.push_str(&posix_quote(service));
    }
    line
}
