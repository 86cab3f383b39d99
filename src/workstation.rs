use std::sync::Arc;

pub const INVALID_WORKSTATION: &str = "Invalid workstation";

// Each counter has an odd B-side position and the even R-side position after it.
const COUNTER_SIDES: [(&str, u32); 2] = [("GND1CKB", 1), ("GND1CKR", 0)];
const GATE_PREFIX: &str = "GND1GTG";
const COUNTER_POSITIONS: u32 = 30;
const GATES: u32 = 4;

pub fn counter_name(workstation: &str) -> Arc<str> {
    let position = |prefix: &str| {
        workstation
            .strip_prefix(prefix)
            .filter(|n| n.len() == 3)
            .and_then(|n| n.parse::<u32>().ok())
    };

    let name = COUNTER_SIDES
        .iter()
        .find_map(|&(prefix, parity)| position(prefix).filter(|n| n % 2 == parity))
        .filter(|n| (1..=COUNTER_POSITIONS).contains(n))
        .map(|n| format!("Counter {}", (n + 1) / 2))
        .or_else(|| {
            position(GATE_PREFIX)
                .filter(|n| (1..=GATES).contains(n))
                .map(|n| format!("Gate {}", n))
        })
        .unwrap_or_else(|| INVALID_WORKSTATION.to_string());

    Arc::from(name)
}
