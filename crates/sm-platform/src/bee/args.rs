use sm_core::{NodeStartDescriptor, NODE_VERBOSITY};

/// Bee stores cache capacity as a chunk count.
const CHUNK_SIZE: u64 = 4096;

/// Command line for `bee start`. The password is never part of it; it goes
/// through the `BEE_PASSWORD` environment variable.
pub fn start_args(descriptor: &NodeStartDescriptor, api_addr: &str) -> Vec<String> {
    let profile = &descriptor.profile;
    let mut args = vec!["start".to_string()];

    let mut flag = |name: &str, value: String| {
        args.push(format!("--{name}={value}"));
    };

    flag("data-dir", descriptor.data_dir.display().to_string());
    flag("api-addr", api_addr.to_string());
    flag("welcome-message", descriptor.welcome_message.clone());
    if !descriptor.nat_address.is_empty() {
        flag("nat-addr", descriptor.nat_address.clone());
    }
    if !descriptor.rpc_endpoint.is_empty() {
        flag("blockchain-rpc-endpoint", descriptor.rpc_endpoint.clone());
    }
    flag("swap-enable", descriptor.swap_enable.to_string());
    flag("full-node", profile.full_node.to_string());
    flag("bootnode-mode", profile.bootnode_mode.to_string());
    flag("mainnet", profile.mainnet.to_string());
    flag("network-id", profile.network_id.to_string());
    for bootnode in &profile.bootnodes {
        flag("bootnode", bootnode.clone());
    }
    flag("swap-initial-deposit", profile.swap_initial_deposit.clone());
    flag("payment-threshold", profile.payment_threshold.clone());
    flag("chequebook-enable", profile.chequebook_enable.to_string());
    flag("use-postage-snapshot", profile.use_postage_snapshot.to_string());
    flag("cache-capacity", (profile.cache_capacity / CHUNK_SIZE).to_string());
    flag("cache-retrieval", profile.retrieval_caching.to_string());
    flag("db-open-files-limit", profile.db_open_files_limit.to_string());
    flag("db-write-buffer-size", profile.db_write_buffer_size.to_string());
    flag(
        "db-block-cache-capacity",
        profile.db_block_cache_capacity.to_string(),
    );
    flag(
        "db-disable-seeks-compaction",
        profile.db_disable_seeks_compaction.to_string(),
    );
    flag("verbosity", NODE_VERBOSITY.to_string());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::NetworkProfile;
    use std::path::PathBuf;

    fn descriptor(swap_enable: bool) -> NodeStartDescriptor {
        NodeStartDescriptor {
            data_dir: PathBuf::from("/data/node"),
            welcome_message: "hello swarm".to_string(),
            nat_address: String::new(),
            rpc_endpoint: if swap_enable {
                "https://rpc.example".to_string()
            } else {
                String::new()
            },
            swap_enable,
            profile: NetworkProfile::mainnet(),
        }
    }

    fn has(args: &[String], expected: &str) -> bool {
        args.iter().any(|a| a == expected)
    }

    #[test]
    fn minimal_node_gets_no_rpc_endpoint() {
        let args = start_args(&descriptor(false), "127.0.0.1:1633");

        assert_eq!(args[0], "start");
        assert!(has(&args, "--data-dir=/data/node"));
        assert!(has(&args, "--api-addr=127.0.0.1:1633"));
        assert!(has(&args, "--welcome-message=hello swarm"));
        assert!(has(&args, "--swap-enable=false"));
        assert!(!args.iter().any(|a| a.starts_with("--blockchain-rpc-endpoint")));
        assert!(!args.iter().any(|a| a.starts_with("--nat-addr")));
    }

    #[test]
    fn payment_node_carries_endpoint_and_network_defaults() {
        let mut d = descriptor(true);
        d.nat_address = "1.2.3.4:1634".to_string();
        let args = start_args(&d, "127.0.0.1:1633");

        assert!(has(&args, "--swap-enable=true"));
        assert!(has(&args, "--blockchain-rpc-endpoint=https://rpc.example"));
        assert!(has(&args, "--nat-addr=1.2.3.4:1634"));
        assert!(has(&args, "--mainnet=true"));
        assert!(has(&args, "--network-id=1"));
        assert!(has(&args, "--bootnode=/dnsaddr/mainnet.ethswarm.org"));
        assert!(has(&args, "--payment-threshold=100000000"));
        assert!(has(&args, "--cache-capacity=8192"));
        assert!(has(&args, "--db-open-files-limit=50"));
        assert!(has(&args, "--verbosity=4"));
    }

    #[test]
    fn password_is_never_on_the_command_line() {
        let args = start_args(&descriptor(true), "127.0.0.1:1633");
        assert!(!args.iter().any(|a| a.contains("password")));
    }
}
