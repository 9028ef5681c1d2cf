// Program-test harness driving the real instruction handlers against the SPL token program.
#![allow(dead_code)]

use anchor_lang::error::ERROR_CODE_OFFSET;
use anchor_lang::prelude::{AccountInfo, Clock};
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::token::spl_token;
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::{Transaction, TransactionError},
};

use raffle_factory::{
    ed25519_program_id, expected_seed_msg, find_factory_address, find_participant_address,
    find_prize_vault_address, find_raffle_address, find_ticket_address, Factory, RaffleError,
};

pub const DECIMALS: u8 = 6;
pub const NAME: &str = "Spring draw";
pub const SYMBOL: &str = "SPR";
pub const URI: &str = "ipfs://spring-draw";

fn process(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    // anchor's entry wants one lifetime for the slice and its elements
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    raffle_factory::entry(program_id, accounts, data)
}

pub fn code(err: RaffleError) -> u32 {
    ERROR_CODE_OFFSET + err as u32
}

pub fn tx_code(err: TransactionError) -> u32 {
    match err {
        TransactionError::InstructionError(_, InstructionError::Custom(c)) => c,
        other => panic!("expected a custom program error, got {other:?}"),
    }
}

pub fn custom_code(err: BanksClientError) -> u32 {
    match err {
        BanksClientError::TransactionError(e) => tx_code(e),
        BanksClientError::SimulationError { err, .. } => tx_code(err),
        other => panic!("unexpected client error: {other:?}"),
    }
}

/// Return data comes back with trailing zero bytes trimmed.
pub fn padded<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out[..data.len()].copy_from_slice(data);
    out
}

fn ix<A: ToAccountMetas, D: InstructionData>(accounts: A, data: D) -> Instruction {
    Instruction {
        program_id: raffle_factory::ID,
        accounts: accounts.to_account_metas(None),
        data: data.data(),
    }
}

pub struct Harness {
    pub ctx: ProgramTestContext,
    pub mint: Pubkey,
    pub oracle: Keypair,
    pub factory: Pubkey,
}

impl Harness {
    /// Factory initialized by the payer (Admin + Manager), oracle configured, prize mint created.
    pub async fn new() -> Self {
        let program_test = ProgramTest::new("raffle_factory", raffle_factory::ID, processor!(process));
        let ctx = program_test.start_with_context().await;

        let (factory, _) = find_factory_address(&raffle_factory::ID);
        let mut h = Self {
            ctx,
            mint: Pubkey::default(),
            oracle: Keypair::new(),
            factory,
        };

        let admin = h.payer();
        h.send(
            &[ix(
                raffle_factory::accounts::InitializeFactory {
                    factory,
                    admin,
                    system_program: anchor_lang::system_program::ID,
                },
                raffle_factory::instruction::InitializeFactory {},
            )],
            &[],
        )
        .await
        .unwrap();

        let oracle = h.oracle.pubkey();
        h.set_oracle(oracle).await.unwrap();
        h.mint = h.create_mint().await;
        h
    }

    pub fn payer(&self) -> Pubkey {
        self.ctx.payer.pubkey()
    }

    pub async fn send(&mut self, ixs: &[Instruction], signers: &[&Keypair]) -> Result<(), BanksClientError> {
        let blockhash = self.ctx.banks_client.get_latest_blockhash().await?;
        let mut all: Vec<&Keypair> = vec![&self.ctx.payer];
        all.extend_from_slice(signers);
        let tx = Transaction::new_signed_with_payer(ixs, Some(&self.ctx.payer.pubkey()), &all, blockhash);
        self.ctx.banks_client.process_transaction(tx).await
    }

    /// Simulates a view instruction and returns its (trimmed) return data or the custom error code.
    pub async fn view(&mut self, instruction: Instruction) -> Result<Vec<u8>, u32> {
        let blockhash = self.ctx.banks_client.get_latest_blockhash().await.unwrap();
        let tx = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.ctx.payer.pubkey()),
            &[&self.ctx.payer],
            blockhash,
        );
        let sim = self.ctx.banks_client.simulate_transaction(tx).await.unwrap();
        match sim.result.expect("simulation ran") {
            Ok(()) => Ok(sim
                .simulation_details
                .and_then(|d| d.return_data)
                .map(|r| r.data)
                .unwrap_or_default()),
            Err(e) => Err(tx_code(e)),
        }
    }

    // -------------------------
    // SPL token plumbing
    // -------------------------

    async fn create_mint(&mut self) -> Pubkey {
        let mint = Keypair::new();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let payer = self.payer();
        let ixs = [
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent.minimum_balance(spl_token::state::Mint::LEN),
                spl_token::state::Mint::LEN as u64,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_mint(&spl_token::ID, &mint.pubkey(), &payer, None, DECIMALS).unwrap(),
        ];
        self.send(&ixs, &[&mint]).await.unwrap();
        mint.pubkey()
    }

    /// New token account of the prize mint owned by `owner`, holding `amount`.
    pub async fn token_account(&mut self, owner: &Pubkey, amount: u64) -> Pubkey {
        let account = Keypair::new();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let payer = self.payer();
        let mut ixs = vec![
            system_instruction::create_account(
                &payer,
                &account.pubkey(),
                rent.minimum_balance(spl_token::state::Account::LEN),
                spl_token::state::Account::LEN as u64,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_account3(&spl_token::ID, &account.pubkey(), &self.mint, owner).unwrap(),
        ];
        if amount > 0 {
            ixs.push(spl_token::instruction::mint_to(&spl_token::ID, &self.mint, &account.pubkey(), &payer, &[], amount).unwrap());
        }
        self.send(&ixs, &[&account]).await.unwrap();
        account.pubkey()
    }

    pub async fn approve(&mut self, source: Pubkey, owner: &Keypair, delegate: &Pubkey, amount: u64) {
        let approve = spl_token::instruction::approve(&spl_token::ID, &source, delegate, &owner.pubkey(), &[], amount).unwrap();
        self.send(&[approve], &[owner]).await.unwrap();
    }

    pub async fn token_balance(&mut self, account: Pubkey) -> u64 {
        let acc = self.ctx.banks_client.get_account(account).await.unwrap().expect("token account");
        spl_token::state::Account::unpack(&acc.data).unwrap().amount
    }

    /// Keypair with enough SOL to pay for its own ticket and participant accounts.
    pub async fn funded_user(&mut self) -> Keypair {
        let user = Keypair::new();
        let payer = self.payer();
        self.send(&[system_instruction::transfer(&payer, &user.pubkey(), 1_000_000_000)], &[])
            .await
            .unwrap();
        user
    }

    pub async fn advance_clock(&mut self, secs: i64) {
        let before: Clock = self.ctx.banks_client.get_sysvar().await.unwrap();
        self.ctx.warp_to_slot(before.slot + 1_000).unwrap();
        let mut clock: Clock = self.ctx.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp = before.unix_timestamp + secs;
        self.ctx.set_sysvar(&clock);
    }

    // -------------------------
    // Program state
    // -------------------------

    pub async fn load<T: AccountDeserialize>(&mut self, address: Pubkey) -> T {
        let acc = self.ctx.banks_client.get_account(address).await.unwrap().expect("program account");
        T::try_deserialize(&mut acc.data.as_slice()).unwrap()
    }

    pub async fn factory_state(&mut self) -> Factory {
        let factory = self.factory;
        self.load(factory).await
    }

    pub fn raffle_address(raffle_id: u64) -> Pubkey {
        find_raffle_address(&raffle_factory::ID, raffle_id).0
    }

    pub fn vault_address(raffle_id: u64) -> Pubkey {
        find_prize_vault_address(&raffle_factory::ID, raffle_id).0
    }

    pub fn ticket_address(raffle_id: u64, ticket_id: u64) -> Pubkey {
        find_ticket_address(&raffle_factory::ID, &Self::raffle_address(raffle_id), ticket_id).0
    }

    pub fn participant_address(raffle_id: u64, user: &Pubkey) -> Pubkey {
        find_participant_address(&raffle_factory::ID, &Self::raffle_address(raffle_id), user).0
    }

    // -------------------------
    // Instructions
    // -------------------------

    pub async fn set_oracle(&mut self, oracle: Pubkey) -> Result<(), BanksClientError> {
        let admin = self.payer();
        let factory = self.factory;
        self.send(
            &[ix(
                raffle_factory::accounts::ManageFactory { factory, admin },
                raffle_factory::instruction::SetOracle { oracle },
            )],
            &[],
        )
        .await
    }

    pub fn role_ix(&self, admin: Pubkey, role: raffle_factory::Role, account: Pubkey, grant: bool) -> Instruction {
        let accounts = raffle_factory::accounts::ManageFactory {
            factory: self.factory,
            admin,
        };
        if grant {
            ix(accounts, raffle_factory::instruction::GrantRole { role, account })
        } else {
            ix(accounts, raffle_factory::instruction::RevokeRole { role, account })
        }
    }

    pub fn migrate_ix(&self, admin: Pubkey) -> Instruction {
        ix(
            raffle_factory::accounts::MigrateFactory {
                factory: self.factory,
                admin,
                system_program: anchor_lang::system_program::ID,
            },
            raffle_factory::instruction::MigrateFactory {},
        )
    }

    pub fn create_raffle_ix(&self, manager: Pubkey, funding_account: Pubkey, raffle_id: u64, amount: u64) -> Instruction {
        ix(
            raffle_factory::accounts::CreateRaffle {
                factory: self.factory,
                raffle: Self::raffle_address(raffle_id),
                prize_mint: self.mint,
                prize_vault: Self::vault_address(raffle_id),
                funding_account,
                manager,
                token_program: spl_token::ID,
                system_program: anchor_lang::system_program::ID,
                rent: anchor_lang::solana_program::sysvar::rent::ID,
            },
            raffle_factory::instruction::CreateRaffle {
                name: NAME.to_string(),
                symbol: SYMBOL.to_string(),
                token_uri: URI.to_string(),
                amount,
            },
        )
    }

    /// Payer-managed raffle funded from a fresh account; returns the funding account.
    pub async fn create_raffle(&mut self, raffle_id: u64, amount: u64) -> Pubkey {
        let payer = self.payer();
        let funding = self.token_account(&payer, amount).await;
        let create = self.create_raffle_ix(payer, funding, raffle_id, amount);
        self.send(&[create], &[]).await.unwrap();
        funding
    }

    pub async fn mint_ticket(&mut self, raffle_id: u64, ticket_id: u64, user: &Keypair) -> Result<(), BanksClientError> {
        let mint = ix(
            raffle_factory::accounts::MintTicket {
                raffle: Self::raffle_address(raffle_id),
                participant: Self::participant_address(raffle_id, &user.pubkey()),
                ticket: Self::ticket_address(raffle_id, ticket_id),
                user: user.pubkey(),
                system_program: anchor_lang::system_program::ID,
            },
            raffle_factory::instruction::MintTicket { raffle_id },
        );
        self.send(&[mint], &[user]).await
    }

    pub async fn transfer_ticket(
        &mut self,
        raffle_id: u64,
        ticket_id: u64,
        from: &Keypair,
        to: Pubkey,
    ) -> Result<(), BanksClientError> {
        let transfer = ix(
            raffle_factory::accounts::TransferTicket {
                raffle: Self::raffle_address(raffle_id),
                ticket: Self::ticket_address(raffle_id, ticket_id),
                from_participant: Self::participant_address(raffle_id, &from.pubkey()),
                to_participant: Self::participant_address(raffle_id, &to),
                from: from.pubkey(),
                system_program: anchor_lang::system_program::ID,
            },
            raffle_factory::instruction::TransferTicket { raffle_id, ticket_id, to },
        );
        self.send(&[transfer], &[from]).await
    }

    /// ed25519 precompile instruction carrying `signer`'s signature over `msg`.
    pub fn signed_msg_ix(signer: &Keypair, msg: &[u8]) -> Instruction {
        let signature = signer.sign_message(msg);
        let header_len: usize = 2 + 14;
        let sig_off = header_len as u16;
        let pk_off = sig_off + 64;
        let msg_off = pk_off + 32;

        let mut data = Vec::with_capacity(header_len + 64 + 32 + msg.len());
        data.extend_from_slice(&[1, 0]);
        for v in [sig_off, u16::MAX, pk_off, u16::MAX, msg_off, msg.len() as u16, u16::MAX] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(signature.as_ref());
        data.extend_from_slice(signer.pubkey().as_ref());
        data.extend_from_slice(msg);

        Instruction {
            program_id: ed25519_program_id(),
            accounts: vec![],
            data,
        }
    }

    pub fn seed_ix(&self, signer: &Keypair, raffle_id: u64, ticket_count: u64, seed: &[u8; 32]) -> Instruction {
        let msg = expected_seed_msg(&raffle_factory::ID, raffle_id, ticket_count, seed);
        Self::signed_msg_ix(signer, &msg)
    }

    pub fn finish_ix(&self, raffle_id: u64, seed: [u8; 32], winning_ticket: Pubkey, winner_token_account: Pubkey) -> Instruction {
        ix(
            raffle_factory::accounts::FinishRaffle {
                factory: self.factory,
                raffle: Self::raffle_address(raffle_id),
                prize_mint: self.mint,
                prize_vault: Self::vault_address(raffle_id),
                winning_ticket,
                winner_token_account,
                manager: self.payer(),
                instructions: anchor_lang::solana_program::sysvar::instructions::ID,
                token_program: spl_token::ID,
            },
            raffle_factory::instruction::FinishRaffle { raffle_id, seed },
        )
    }

    /// Oracle-signed settlement; `ticket_count` is what the oracle signed over.
    pub async fn finish(
        &mut self,
        raffle_id: u64,
        ticket_count: u64,
        seed: [u8; 32],
        winning_ticket: Pubkey,
        winner_token_account: Pubkey,
    ) -> Result<(), BanksClientError> {
        let seed_ix = self.seed_ix(&self.oracle, raffle_id, ticket_count, &seed);
        let finish = self.finish_ix(raffle_id, seed, winning_ticket, winner_token_account);
        self.send(&[seed_ix, finish], &[]).await
    }

    pub fn cancel_ix(&self, raffle_id: u64, refund_account: Pubkey) -> Instruction {
        ix(
            raffle_factory::accounts::CancelRaffle {
                factory: self.factory,
                raffle: Self::raffle_address(raffle_id),
                prize_mint: self.mint,
                prize_vault: Self::vault_address(raffle_id),
                refund_account,
                manager: self.payer(),
                token_program: spl_token::ID,
            },
            raffle_factory::instruction::CancelRaffle { raffle_id },
        )
    }

    // -------------------------
    // Views
    // -------------------------

    pub async fn balance_of(&mut self, raffle_id: u64, user: Pubkey) -> u64 {
        let view = ix(
            raffle_factory::accounts::BalanceView {
                raffle: Self::raffle_address(raffle_id),
                participant: Self::participant_address(raffle_id, &user),
            },
            raffle_factory::instruction::BalanceOf { raffle_id, user },
        );
        u64::from_le_bytes(padded(&self.view(view).await.unwrap()))
    }

    pub async fn holder_of(&mut self, raffle_id: u64, ticket_id: u64) -> Result<Pubkey, u32> {
        let view = ix(
            raffle_factory::accounts::TicketView {
                raffle: Self::raffle_address(raffle_id),
                ticket: Self::ticket_address(raffle_id, ticket_id),
            },
            raffle_factory::instruction::HolderOf { raffle_id, ticket_id },
        );
        self.view(view).await.map(|d| Pubkey::new_from_array(padded(&d)))
    }

    pub async fn ticket_uri(&mut self, raffle_id: u64, ticket_id: u64) -> Result<String, u32> {
        let view = ix(
            raffle_factory::accounts::TicketView {
                raffle: Self::raffle_address(raffle_id),
                ticket: Self::ticket_address(raffle_id, ticket_id),
            },
            raffle_factory::instruction::TicketUri { raffle_id, ticket_id },
        );
        self.view(view).await.map(|d| {
            let len = u32::from_le_bytes(padded(&d[..4])) as usize;
            String::from_utf8(d[4..4 + len].to_vec()).unwrap()
        })
    }

    pub fn factory_view_ix<D: InstructionData>(&self, data: D) -> Instruction {
        ix(raffle_factory::accounts::FactoryView { factory: self.factory }, data)
    }
}
