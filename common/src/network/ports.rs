use crate::error::SweepError;

/// Parses `"22, 80,443"` into ports.
///
/// Entries that are not numbers in `1..=65535` are dropped. Duplicates keep
/// their first position. An empty result is an error.
pub fn parse_ports(csv: &str) -> Result<Vec<u16>, SweepError> {
    let mut ports: Vec<u16> = Vec::new();

    for part in csv.split(',') {
        let Ok(port) = part.trim().parse::<u16>() else {
            continue;
        };
        if port != 0 && !ports.contains(&port) {
            ports.push(port);
        }
    }

    if ports.is_empty() {
        return Err(SweepError::NoValidPorts(csv.to_string()));
    }
    Ok(ports)
}
