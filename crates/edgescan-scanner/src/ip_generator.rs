//! Produces a finite, representative sample of candidate IPs from a list
//! of CIDR blocks.
//!
//! Exhaustively enumerating large IPv4 blocks (or essentially any IPv6
//! block) is infeasible, so each block is sampled with a random walk of
//! its higher-order octets instead: pick a few random host addresses per
//! step, advance, repeat until the block is exhausted or a safety cap is
//! hit. `/32` and `/128` blocks always yield exactly the one address.

use ipnetwork::IpNetwork;
use rand::Rng;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::warn;

const MAX_ITERATIONS: u32 = 10_000;
const SAMPLES_PER_IPV4_STEP: usize = 3;

/// Generate candidate IPs from `blocks` in the order the blocks were given.
/// Unparseable blocks are logged and skipped; the rest of the list is
/// still processed.
pub fn generate(blocks: &[String]) -> Vec<IpAddr> {
    let mut out = Vec::new();
    for block in blocks {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_block(trimmed) {
            Ok(network) => match network {
                IpNetwork::V4(net) => generate_v4(net, &mut out),
                IpNetwork::V6(net) => generate_v6(net, &mut out),
            },
            Err(_) => warn!(block = trimmed, "skipping unparseable CIDR block"),
        }
    }
    out
}

fn parse_block(block: &str) -> Result<IpNetwork, ipnetwork::IpNetworkError> {
    if block.contains('/') {
        block.parse::<IpNetwork>()
    } else if block.contains(':') {
        format!("{block}/128").parse::<IpNetwork>()
    } else {
        format!("{block}/32").parse::<IpNetwork>()
    }
}

fn generate_v4(net: ipnetwork::Ipv4Network, out: &mut Vec<IpAddr>) {
    if net.prefix() == 32 {
        out.push(IpAddr::V4(net.ip()));
        return;
    }

    let mut rng = rand::thread_rng();
    let mask_octets = net.mask().octets();
    let host_bits_last_octet = !mask_octets[3];
    let min_last_octet = net.ip().octets()[3] & mask_octets[3];

    let mut octets = net.network().octets();
    let mut iterations = 0;
    while net.contains(Ipv4Addr::from(octets)) && iterations < MAX_ITERATIONS {
        for _ in 0..SAMPLES_PER_IPV4_STEP {
            let offset = if host_bits_last_octet == 0 {
                0
            } else {
                rng.gen_range(0..=host_bits_last_octet)
            };
            let mut sample = octets;
            sample[3] = min_last_octet.wrapping_add(offset);
            out.push(IpAddr::V4(Ipv4Addr::from(sample)));
        }

        // advance the third octet, carrying into the second and first
        octets[2] = octets[2].wrapping_add(1);
        if octets[2] == 0 {
            octets[1] = octets[1].wrapping_add(1);
            if octets[1] == 0 {
                octets[0] = octets[0].wrapping_add(1);
            }
        }
        iterations += 1;
    }
}

fn generate_v6(net: ipnetwork::Ipv6Network, out: &mut Vec<IpAddr>) {
    if net.prefix() == 128 {
        out.push(IpAddr::V6(net.ip()));
        return;
    }

    let mut rng = rand::thread_rng();
    let mut octets = net.network().octets();
    let mut iterations = 0;
    while net.contains(Ipv6Addr::from(octets)) && iterations < MAX_ITERATIONS {
        octets[15] = rng.gen_range(0..=255u8);
        octets[14] = rng.gen_range(0..=255u8);
        out.push(IpAddr::V6(Ipv6Addr::from(octets)));

        for i in (0..14).rev() {
            let prev = octets[i];
            octets[i] = octets[i].wrapping_add(rng.gen_range(0..=255u8));
            if octets[i] >= prev {
                break;
            }
        }
        iterations += 1;
    }
}
