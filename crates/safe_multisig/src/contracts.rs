//! Contract interface definitions used by the coordinator.

pub mod safe {
    use alloy_sol_types::sol;

    sol! {
        /// Safe wallet interface (v1.3.0 / v1.4.1 compatible subset).
        interface Safe {
            function nonce() external view returns (uint256);

            function getThreshold() external view returns (uint256);

            function getOwners() external view returns (address[] memory);

            function isOwner(address owner) external view returns (bool);

            function VERSION() external view returns (string memory);

            function getTransactionHash(
                address to,
                uint256 value,
                bytes calldata data,
                uint8 operation,
                uint256 safeTxGas,
                uint256 baseGas,
                uint256 gasPrice,
                address gasToken,
                address refundReceiver,
                uint256 _nonce
            ) external view returns (bytes32);

            function execTransaction(
                address to,
                uint256 value,
                bytes calldata data,
                uint8 operation,
                uint256 safeTxGas,
                uint256 baseGas,
                uint256 gasPrice,
                address gasToken,
                address payable refundReceiver,
                bytes memory signatures
            ) external payable returns (bool);

            /// EIP-1271 signature validation, dispatched through the wallet's
            /// fallback handler. Also exposed by other contract signers.
            function isValidSignature(
                bytes32 _dataHash,
                bytes calldata _signature
            ) external view returns (bytes4);

            event ExecutionSuccess(bytes32 indexed txHash, uint256 payment);
            event ExecutionFailure(bytes32 indexed txHash, uint256 payment);
        }
    }
}

pub mod multi_send {
    use alloy_sol_types::sol;

    sol! {
        /// MultiSend helper for batching calls through a single delegatecall.
        ///
        /// `transactions` is the packed encoding of the batched calls:
        /// operation (1 byte) | to (20 bytes) | value (32 bytes) |
        /// data length (32 bytes) | data
        interface MultiSend {
            function multiSend(bytes memory transactions) external payable;
        }
    }
}

pub mod pool_factory {
    use alloy_sol_types::sol;

    sol! {
        /// Lending pool factory owned by the platform Safe.
        interface PoolFactory {
            function createPool(
                address asset,
                uint256 interestRateBps,
                uint256 maxCapacity
            ) external returns (uint256, address);

            event PoolCreated(uint256 indexed poolId, address pool, address asset);
        }
    }
}
