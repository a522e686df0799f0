mod json_rpc_prober;

pub use json_rpc_prober::JsonRpcChainProber;
