//! Credential handling
//!
//! Models the array-side credential (password or pre-issued API token)
//! and resolves missing secrets, blocking on an interactive prompt the
//! way the CLI flow expects. The prompt sits behind the [`SecretPrompt`]
//! trait so tests never touch a terminal.

mod credentials;

pub use credentials::{
    resolve, ArrayCredential, ResolvedCredentials, SecretPrompt, TerminalPrompt,
    ARRAY_PASSWORD_PROMPT, VSPHERE_PASSWORD_PROMPT,
};
