//! Wormhole contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the external
//! contracts the scripts talk to. Only the functions actually called are
//! declared; the contracts themselves are not part of this repository.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Wormhole core bridge
    #[sol(rpc)]
    contract IWormhole {
        /// Emitted for every published message; `sequence` identifies the VAA
        event LogMessagePublished(
            address indexed sender,
            uint64 sequence,
            uint32 nonce,
            bytes payload,
            uint8 consistencyLevel
        );

        /// Fee (in native token) charged for publishing a message
        function messageFee() external view returns (uint256);
    }
}

sol! {
    /// Wormhole Token Bridge
    #[sol(rpc)]
    contract ITokenBridge {
        /// Lock (or burn, for wrapped assets) `amount` and publish a transfer VAA
        function transferTokens(
            address token,
            uint256 amount,
            uint16 recipientChain,
            bytes32 recipient,
            uint256 arbiterFee,
            uint32 nonce
        ) external payable returns (uint64 sequence);

        /// Publish an AssetMeta VAA so other chains can create a wrapped asset
        function attestToken(address tokenAddress, uint32 nonce) external payable returns (uint64 sequence);

        /// Create a wrapped asset from an AssetMeta VAA
        function createWrapped(bytes memory encodedVm) external returns (address token);

        /// Refresh an existing wrapped asset from a newer AssetMeta VAA
        function updateWrapped(bytes memory encodedVm) external returns (address token);

        /// Redeem a transfer VAA; selector is what WormRouter executes on delivery
        function completeTransfer(bytes memory encodedVm) external;

        /// Wrapped asset address for a foreign token (zero if not attested)
        function wrappedAsset(uint16 tokenChainId, bytes32 tokenAddress) external view returns (address);
    }
}

sol! {
    /// Wormhole automatic relayer
    #[sol(rpc)]
    contract IWormholeRelayer {
        /// Identifies a VAA to be delivered alongside the relay request
        struct VaaKey {
            uint16 chainId;
            bytes32 emitterAddress;
            uint64 sequence;
        }

        /// Request delivery of `payload` plus the referenced VAAs to `targetAddress`
        function sendVaasToEvm(
            uint16 targetChain,
            address targetAddress,
            bytes memory payload,
            uint256 receiverValue,
            uint256 gasLimit,
            VaaKey[] memory vaaKeys
        ) external payable returns (uint64 sequence);

        /// Price (in source native token) of a delivery with the default provider
        function quoteEVMDeliveryPrice(
            uint16 targetChain,
            uint256 receiverValue,
            uint256 gasLimit
        ) external view returns (uint256 nativePriceQuote, uint256 targetChainRefundPerGasUnused);
    }
}

sol! {
    /// ERC20 token
    #[sol(rpc)]
    contract IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    /// Mintable ERC20 used as the round-trip test token
    #[sol(rpc)]
    contract ERC20Mock {
        function mint(address account, uint256 amount) external;
    }
}
