//! `ecostore hash-password` - produce an argon2id hash for a password.
//!
//! The password is read from stdin so it never shows up in shell history.

use std::io::BufRead;

use secrecy::{ExposeSecret, SecretString};

use ecostore_storefront::services::auth::hash_password;

use super::CliError;

fn read_password(input: impl BufRead) -> Result<SecretString, CliError> {
    let mut line = String::new();
    let mut input = input;
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }
    Ok(SecretString::from(password.to_string()))
}

/// Read one line from stdin and print its hash.
///
/// # Errors
///
/// Returns an error if stdin is empty or hashing fails.
#[allow(clippy::print_stdout)]
pub fn hash_from_stdin() -> Result<(), CliError> {
    let password = read_password(std::io::stdin().lock())?;
    let hash = hash_password(password.expose_secret())?;
    println!("{hash}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_password_strips_newline() {
        let secret = read_password("hunter2-eco\n".as_bytes()).unwrap();
        assert_eq!(secret.expose_secret(), "hunter2-eco");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            read_password("\n".as_bytes()),
            Err(CliError::EmptyPassword)
        ));
    }
}
