use clap::Parser;
use lazy_static::lazy_static;
use mut_static::MutStatic;

/// Default number of workers used for bulk exponentiation
pub const NUM_THREADS: usize = 10;
/// Default Miller-Rabin rounds, false positive chance <= 4^-20
pub const MILLER_RABIN_ROUNDS: u32 = 20;

#[macro_export]
macro_rules! rsa_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
#[command(about = "RSA key generation, encryption and signatures")]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, encrypt, decrypt, sign, verify, test")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Key path, generate/detect `path' and `path.pub'")]
    pub key: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename, derived from input when empty")]
    pub output: String,
    #[clap(long, value_parser, default_value = $CONFIG.signature.as_str(), help = "Signature filename, derived from input when empty")]
    pub signature: String,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.bits, help = "Modulus bits, each prime gets half")]
    pub bits: u64,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.rounds, help = "Miller Rabin calculate rounds")]
    pub rounds: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.attempts, help = "Max prime candidates to try, 0 for unlimited")]
    pub attempts: u64,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.threads, help = "Calculate in <THREADS> threads")]
    pub threads: usize,
    #[clap(long, value_parser, default_value_t = $CONFIG.text, help = "Use comma separated decimal ciphertext")]
    pub text: bool,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

rsa_t!(CONFIG_DEF, Config);

lazy_static! {
    pub static ref CONFIG_DEF: Config = Config {
        mode: String::from("generate"),
        key: String::from(".rsa/key"),
        input: String::from("stdin"),
        output: String::from(""),
        signature: String::from(""),
        bits: 16,
        rounds: MILLER_RABIN_ROUNDS,
        attempts: 0,
        threads: NUM_THREADS,
        text: false,
        silent: false,
    };
    pub static ref SILENT: MutStatic<bool> = MutStatic::from(false);
}

/// Small primes used for trial division, larger keys get a longer table
pub fn sieve_limit(bits: u64) -> usize {
    if bits <= 32 { 256 } else { 1024 }
}

pub fn is_silent() -> bool {
    match SILENT.read() {
        Ok(silent) => *silent,
        Err(_) => false,
    }
}

pub fn set_silent(silent: bool) {
    if let Ok(mut s) = SILENT.write() {
        *s = silent;
    }
}

impl Config {
    pub fn get(&self) -> &Config {
        self
    }

    pub fn max_attempts(&self) -> Option<u64> {
        match self.attempts {
            0 => None,
            n => Some(n),
        }
    }
}
