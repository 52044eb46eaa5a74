//! ABI bindings for the contracts the provisioning plan deploys and calls.
use alloy::sol;

sol! {
    contract ProxyAdmin {
        function upgrade(address proxy, address implementation) external;

        function upgradeAndCall(address proxy, address implementation, bytes data) external payable;
    }

    contract TransparentUpgradeableProxy {
        constructor(address logic, address admin, bytes data) payable;
    }

    contract PauserRegistry {
        constructor(address[] pausers, address unpauser);
    }

    contract StrategyBaseTVLLimits {
        constructor(address strategyManager);

        function initialize(
            uint256 maxPerDeposit,
            uint256 maxTotalDeposits,
            address underlyingToken,
            address pauserRegistry
        ) external;
    }

    contract StrategyManager {
        function addStrategiesToDepositWhitelist(
            address[] strategiesToWhitelist,
            bool[] thirdPartyTransfersForbiddenValues
        ) external;
    }

    contract RegistryCoordinator {
        #[derive(Debug, PartialEq, Eq)]
        struct OperatorSetParam {
            uint32 maxOperatorCount;
            uint16 kickBIPsOfOperatorStake;
            uint16 kickBIPsOfTotalStake;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct StrategyParams {
            address strategy;
            uint96 multiplier;
        }

        constructor(
            address serviceManager,
            address stakeRegistry,
            address blsApkRegistry,
            address indexRegistry
        );

        function initialize(
            address initialOwner,
            address churnApprover,
            address ejector,
            address pauserRegistry,
            uint256 initialPausedStatus,
            OperatorSetParam[] operatorSetParams,
            uint96[] minimumStakes,
            StrategyParams[][] strategyParams
        ) external;
    }

    contract StakeRegistry {
        constructor(address registryCoordinator, address delegationManager);
    }

    contract BLSApkRegistry {
        constructor(address registryCoordinator);
    }

    contract IndexRegistry {
        constructor(address registryCoordinator);
    }

    contract AlignedLayerServiceManager {
        constructor(
            address avsDirectory,
            address registryCoordinator,
            address stakeRegistry,
            address taskManager
        );

        function initialize(address initialOwner) external;
    }

    contract AlignedLayerTaskManager {
        constructor(address registryCoordinator, uint32 taskResponseWindowBlock);

        function initialize(
            address pauserRegistry,
            address initialOwner,
            address aggregator,
            address generator
        ) external;
    }
}
