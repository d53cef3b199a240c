mod common;

use anchor_lang::prelude::*;
use common::{assert_error, program_data, TestEnv, UNBONDING_PERIOD};
use vault_stake::context::Invocation;
use vault_stake::custody::{TokenAccountRef, TokenCustody};
use vault_stake::error::{error_kind, ErrorKind, VaultStakeErrorCode};
use vault_stake::instruction::VaultStakeInstruction;
use vault_stake::state::{MAX_ADMINISTRATORS, MAX_UNBONDING_PERIOD};

fn deposit(amount: u64) -> VaultStakeInstruction {
    VaultStakeInstruction::Deposit { amount }
}

fn freeze(token_account: TokenAccountRef) -> VaultStakeInstruction {
    VaultStakeInstruction::FreezeTokenAccount { token_account }
}

fn thaw(token_account: TokenAccountRef) -> VaultStakeInstruction {
    VaultStakeInstruction::ThawTokenAccount { token_account }
}

fn keys(n: usize) -> Vec<Pubkey> {
    (0..n).map(|_| Pubkey::new_unique()).collect()
}

#[test]
fn initialize_records_configuration() {
    let env = TestEnv::initialized();
    let config = env.program.config().unwrap().unwrap();
    assert_eq!(config.vault_mint, env.vault_mint);
    assert_eq!(config.stake_mint, env.stake_mint);
    assert_eq!(config.unbonding_period, UNBONDING_PERIOD);
    assert_eq!(config.freeze_administrators.as_slice(), &[env.freeze_admin]);
    assert_eq!(config.rewards_administrators.as_slice(), &[env.rewards_admin]);
    assert!(!config.paused);
}

#[test]
fn initialize_happens_once() {
    let mut env = TestEnv::initialized();
    let ix = env.initialize_ix(1);
    let err = env.exec(env.deployer, ix).unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::AlreadyInitialized)
    );
    assert_eq!(error_kind(&err), ErrorKind::StateConflict);
    assert_eq!(
        env.program.config().unwrap().unwrap().unbonding_period,
        UNBONDING_PERIOD
    );
}

#[test]
fn only_the_deploy_authority_initializes() {
    let mut env = TestEnv::deployed();
    let ix = env.initialize_ix(UNBONDING_PERIOD);
    let err = env.exec(Pubkey::new_unique(), ix).unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::InvalidUpgradeAuthority)
    );
    assert_eq!(error_kind(&err), ErrorKind::Authorization);
    assert!(env.program.config().unwrap().is_none());
}

#[test]
fn immutable_program_cannot_be_administered() {
    let mut env = TestEnv::deployed();
    env.program.set_program_data(program_data(None));
    let ix = env.initialize_ix(UNBONDING_PERIOD);
    assert_error(
        env.exec(env.deployer, ix),
        VaultStakeErrorCode::NoUpgradeAuthority,
    );
}

#[test]
fn initialize_validates_arguments() {
    let mut env = TestEnv::deployed();
    let deployer = env.deployer;

    let mut ix = env.initialize_ix(UNBONDING_PERIOD);
    if let VaultStakeInstruction::Initialize {
        freeze_administrators,
        ..
    } = &mut ix
    {
        *freeze_administrators = keys(MAX_ADMINISTRATORS + 1);
    }
    assert_error(
        env.exec(deployer, ix),
        VaultStakeErrorCode::TooManyAdministrators,
    );

    let mut ix = env.initialize_ix(UNBONDING_PERIOD);
    if let VaultStakeInstruction::Initialize {
        rewards_administrators,
        ..
    } = &mut ix
    {
        let admin = Pubkey::new_unique();
        *rewards_administrators = vec![admin, admin];
    }
    assert_error(
        env.exec(deployer, ix),
        VaultStakeErrorCode::DuplicateAdministrator,
    );

    let mut ix = env.initialize_ix(UNBONDING_PERIOD);
    if let VaultStakeInstruction::Initialize { stake_mint, .. } = &mut ix {
        *stake_mint = env.vault_mint;
    }
    assert_error(
        env.exec(deployer, ix),
        VaultStakeErrorCode::VaultAndMintCannotBeSame,
    );

    for period in [-1, MAX_UNBONDING_PERIOD + 1] {
        let ix = env.initialize_ix(period);
        assert_error(
            env.exec(deployer, ix),
            VaultStakeErrorCode::InvalidBondingPeriod,
        );
    }
    assert!(env.program.config().unwrap().is_none());

    // bounds are inclusive
    let ix = env.initialize_ix(MAX_UNBONDING_PERIOD);
    env.exec(deployer, ix).unwrap();
}

#[test]
fn operations_before_initialize_report_not_initialized() {
    let mut env = TestEnv::deployed();
    let deployer = env.deployer;
    let err = env
        .exec(deployer, VaultStakeInstruction::Pause { pause: true })
        .unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::NotInitialized)
    );
    assert_eq!(error_kind(&err), ErrorKind::NotFound);
}

#[test]
fn update_config_changes_period() {
    let mut env = TestEnv::initialized();
    let deployer = env.deployer;
    env.exec(
        deployer,
        VaultStakeInstruction::UpdateConfig {
            new_unbonding_period: 0,
        },
    )
    .unwrap();
    assert_eq!(env.program.config().unwrap().unwrap().unbonding_period, 0);

    assert_error(
        env.exec(
            deployer,
            VaultStakeInstruction::UpdateConfig {
                new_unbonding_period: -5,
            },
        ),
        VaultStakeErrorCode::InvalidBondingPeriod,
    );
    assert_eq!(env.program.config().unwrap().unwrap().unbonding_period, 0);
}

#[test]
fn administrative_calls_require_deploy_authority() {
    let mut env = TestEnv::initialized();
    let outsiders = [env.freeze_admin, env.rewards_admin, Pubkey::new_unique()];
    for outsider in outsiders {
        let calls = vec![
            VaultStakeInstruction::UpdateConfig {
                new_unbonding_period: 1,
            },
            VaultStakeInstruction::Pause { pause: true },
            VaultStakeInstruction::UpdateFreezeAdministrators {
                new_administrators: vec![outsider],
            },
            VaultStakeInstruction::UpdateRewardsAdministrators {
                new_administrators: vec![outsider],
            },
            VaultStakeInstruction::SetMintAuthority {
                new_authority: outsider,
            },
        ];
        for ix in calls {
            assert_error(
                env.exec(outsider, ix),
                VaultStakeErrorCode::InvalidUpgradeAuthority,
            );
        }
    }

    let config = env.program.config().unwrap().unwrap();
    assert_eq!(config.unbonding_period, UNBONDING_PERIOD);
    assert!(!config.paused);
    assert_eq!(config.freeze_administrators.as_slice(), &[env.freeze_admin]);
    assert_eq!(
        env.ledger.mint_authority(&env.stake_mint),
        Some(env.authorities.mint_authority)
    );
}

#[test]
fn administrator_lists_are_replaced_wholesale() {
    let mut env = TestEnv::initialized();
    let deployer = env.deployer;
    let new_admins = keys(MAX_ADMINISTRATORS);

    env.exec(
        deployer,
        VaultStakeInstruction::UpdateFreezeAdministrators {
            new_administrators: new_admins.clone(),
        },
    )
    .unwrap();
    let config = env.program.config().unwrap().unwrap();
    assert_eq!(config.freeze_administrators.as_slice(), new_admins.as_slice());
    assert_eq!(config.rewards_administrators.as_slice(), &[env.rewards_admin]);

    // the previous administrator lost the role
    let holder = env.holder(10);
    env.exec(holder, deposit(10)).unwrap();
    let target = env.stake_account(&holder);
    assert_error(
        env.exec(env.freeze_admin, freeze(target)),
        VaultStakeErrorCode::UnauthorizedFreezeAdministrator,
    );
    env.exec(new_admins[4], freeze(target)).unwrap();

    env.exec(
        deployer,
        VaultStakeInstruction::UpdateRewardsAdministrators {
            new_administrators: vec![],
        },
    )
    .unwrap();
    assert!(env
        .program
        .config()
        .unwrap()
        .unwrap()
        .rewards_administrators
        .is_empty());
}

#[test]
fn oversized_administrator_list_leaves_config_untouched() {
    let mut env = TestEnv::initialized();
    let deployer = env.deployer;
    assert_error(
        env.exec(
            deployer,
            VaultStakeInstruction::UpdateRewardsAdministrators {
                new_administrators: keys(MAX_ADMINISTRATORS + 1),
            },
        ),
        VaultStakeErrorCode::TooManyAdministrators,
    );
    assert_error(
        env.exec(
            deployer,
            VaultStakeInstruction::UpdateFreezeAdministrators {
                new_administrators: keys(MAX_ADMINISTRATORS + 1),
            },
        ),
        VaultStakeErrorCode::TooManyAdministrators,
    );
    let config = env.program.config().unwrap().unwrap();
    assert_eq!(config.rewards_administrators.as_slice(), &[env.rewards_admin]);
    assert_eq!(config.freeze_administrators.as_slice(), &[env.freeze_admin]);
}

#[test]
fn non_administrator_cannot_freeze() {
    let mut env = TestEnv::initialized();
    let holder = env.holder(100);
    env.exec(holder, deposit(100)).unwrap();
    let target = env.stake_account(&holder);

    let err = env.exec(Pubkey::new_unique(), freeze(target)).unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::UnauthorizedFreezeAdministrator)
    );
    assert_eq!(error_kind(&err), ErrorKind::Authorization);
    assert!(!env.ledger.is_frozen(&target));

    let admin = env.freeze_admin;
    env.exec(admin, freeze(target)).unwrap();
    let outsiders = [env.deployer, env.rewards_admin, holder];
    for outsider in outsiders {
        assert_error(
            env.exec(outsider, thaw(target)),
            VaultStakeErrorCode::UnauthorizedFreezeAdministrator,
        );
    }
    assert!(env.ledger.is_frozen(&target));
}

#[test]
fn program_escrow_cannot_be_frozen() {
    let mut env = TestEnv::initialized();
    let admin = env.freeze_admin;
    let holder = env.holder(100);
    let other = env.holder(30);
    env.exec(holder, deposit(100)).unwrap();
    env.exec(other, deposit(30)).unwrap();
    env.exec(holder, VaultStakeInstruction::Unbond { amount: 100 })
        .unwrap();
    env.advance(UNBONDING_PERIOD);

    let escrow = TokenAccountRef::new(env.authorities.escrow_authority, env.stake_mint);
    let err = env.exec(admin, freeze(escrow)).unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::ProgramOwnedAccount)
    );
    assert_eq!(error_kind(&err), ErrorKind::Validation);
    assert_error(
        env.exec(admin, thaw(escrow)),
        VaultStakeErrorCode::ProgramOwnedAccount,
    );
    assert!(!env.ledger.is_frozen(&escrow));

    // no program authority is a valid target, whatever its role
    let authorities = [
        env.authorities.vault_authority,
        env.authorities.mint_authority,
        env.authorities.freeze_authority,
    ];
    for authority in authorities {
        let target = TokenAccountRef::new(authority, env.stake_mint);
        assert_error(
            env.exec(admin, freeze(target)),
            VaultStakeErrorCode::ProgramOwnedAccount,
        );
    }

    env.exec(holder, VaultStakeInstruction::Redeem).unwrap();
    assert_eq!(env.vault_balance(&holder), 100);
    env.exec(other, VaultStakeInstruction::Unbond { amount: 30 })
        .unwrap();
    assert_eq!(env.escrow_balance(), 30);
}

#[test]
fn freeze_and_thaw_stake_account() {
    let mut env = TestEnv::initialized();
    let admin = env.freeze_admin;
    let holder = env.holder(101);
    env.exec(holder, deposit(100)).unwrap();
    let target = env.stake_account(&holder);

    env.exec(admin, freeze(target)).unwrap();
    assert!(env.ledger.is_frozen(&target));

    // a frozen account cannot receive newly minted stake
    let err = env.exec(holder, deposit(1)).unwrap_err();
    assert_eq!(error_kind(&err), ErrorKind::Custody);
    assert_eq!(env.vault_balance(&holder), 1);
    assert_eq!(env.custody_balance(), 100);

    // freezing twice is rejected by custody
    assert_eq!(
        error_kind(&env.exec(admin, freeze(target)).unwrap_err()),
        ErrorKind::Custody
    );

    env.exec(admin, thaw(target)).unwrap();
    assert!(!env.ledger.is_frozen(&target));
    env.exec(holder, VaultStakeInstruction::Unbond { amount: 100 })
        .unwrap();
}

#[test]
fn freeze_still_works_while_paused() {
    let mut env = TestEnv::initialized();
    let holder = env.holder(5);
    env.exec(holder, deposit(5)).unwrap();
    let deployer = env.deployer;
    env.exec(deployer, VaultStakeInstruction::Pause { pause: true })
        .unwrap();

    let target = env.stake_account(&holder);
    env.exec(env.freeze_admin, freeze(target)).unwrap();
    assert!(env.ledger.is_frozen(&target));
}

#[test]
fn vault_asset_accounts_cannot_be_frozen() {
    let mut env = TestEnv::initialized();
    let holder = env.holder(100);
    let target = TokenAccountRef::new(holder, env.vault_mint);

    let err = env.exec(env.freeze_admin, freeze(target)).unwrap_err();
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(VaultStakeErrorCode::InvalidMint)
    );
    assert_eq!(error_kind(&err), ErrorKind::Validation);
    assert!(!env.ledger.is_frozen(&target));
    assert_error(
        env.exec(env.freeze_admin, thaw(target)),
        VaultStakeErrorCode::InvalidMint,
    );
}

#[test]
fn handing_over_mint_authority_stops_issuance() {
    let mut env = TestEnv::initialized();
    let deployer = env.deployer;
    let successor = Pubkey::new_unique();
    let holder = env.holder(100);

    env.exec(
        deployer,
        VaultStakeInstruction::SetMintAuthority {
            new_authority: successor,
        },
    )
    .unwrap();
    assert_eq!(env.ledger.mint_authority(&env.stake_mint), Some(successor));

    let err = env.exec(holder, deposit(100)).unwrap_err();
    assert_eq!(error_kind(&err), ErrorKind::Custody);
    assert_eq!(env.vault_balance(&holder), 100);
    assert_eq!(env.custody_balance(), 0);
    assert_eq!(env.stake_supply(), 0);

    // the program no longer holds the authority, so a second handover fails
    assert_eq!(
        error_kind(
            &env.exec(
                deployer,
                VaultStakeInstruction::SetMintAuthority {
                    new_authority: deployer,
                },
            )
            .unwrap_err()
        ),
        ErrorKind::Custody
    );
}

#[test]
fn encoded_instructions_are_decoded() {
    let mut env = TestEnv::initialized();
    let holder = env.holder(40);

    let mut data = Vec::new();
    deposit(40).serialize(&mut data).unwrap();
    env.program
        .process_instruction(&mut env.ledger, Invocation::new(holder, env.now), &data)
        .unwrap();
    assert_eq!(env.stake_balance(&holder), 40);

    let err = env
        .program
        .process_instruction(
            &mut env.ledger,
            Invocation::new(holder, env.now),
            &[0xff, 0x01],
        )
        .unwrap_err();
    assert_eq!(VaultStakeErrorCode::from_error(&err), None);
    assert_eq!(error_kind(&err), ErrorKind::Validation);
}
