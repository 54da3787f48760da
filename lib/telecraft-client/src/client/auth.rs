// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods related to logging in, signing up, and two-factor passwords.
use super::Client;
use log::info;
use std::fmt;
use telecraft_crypto::srp;
use telecraft_mtsender::InvocationError;
use telecraft_tl::{enums, functions, types};

/// A login code was requested; keep this around to complete the login.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginToken {
    pub(crate) phone: String,
    pub(crate) phone_code_hash: String,
}

impl LoginToken {
    /// The hash identifying the sent code at the server.
    pub fn phone_code_hash(&self) -> &str {
        &self.phone_code_hash
    }
}

/// The error type returned when signing in fails.
#[derive(Debug)]
pub enum SignInError {
    /// The phone number has no account yet; call [`Client::sign_up`].
    SignUpRequired,

    /// The account has two-factor authentication enabled; call
    /// [`Client::check_password`].
    PasswordRequired,

    /// The provided code was invalid.
    InvalidCode,

    Other(InvocationError),
}

impl fmt::Display for SignInError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignUpRequired => write!(f, "sign in error: sign up required"),
            Self::PasswordRequired => write!(f, "sign in error: 2fa password required"),
            Self::InvalidCode => write!(f, "sign in error: invalid code"),
            Self::Other(e) => write!(f, "sign in error: {}", e),
        }
    }
}

impl std::error::Error for SignInError {}

/// The error type returned when checking the 2FA password fails.
#[derive(Debug)]
pub enum PasswordError {
    /// The account has no password set, or the server sent parameters
    /// this client cannot work with.
    NoPassword,

    /// The password did not match.
    InvalidPassword,

    Other(InvocationError),
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPassword => write!(f, "password error: no usable password parameters"),
            Self::InvalidPassword => write!(f, "password error: invalid password"),
            Self::Other(e) => write!(f, "password error: {}", e),
        }
    }
}

impl std::error::Error for PasswordError {}

impl Client {
    /// Return `true` if the session is authorized to make API calls as
    /// some account.
    pub async fn is_authorized(&mut self) -> Result<bool, InvocationError> {
        match self.invoke(&functions::updates::GetState {}).await {
            Ok(_) => Ok(true),
            Err(InvocationError::Rpc(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Request a login code for the phone number.
    pub async fn send_code(&mut self, phone: &str) -> Result<LoginToken, SignInError> {
        let request = functions::auth::SendCode {
            phone_number: phone.to_string(),
            api_id: self.config.api_id,
            api_hash: self.config.api_hash.clone(),
            settings: types::CodeSettings {
                allow_flashcall: false,
                current_number: true,
                allow_app_hash: true,
            },
        };

        match self.invoke(&request).await {
            Ok(enums::auth::SentCode::Code(sent)) => Ok(LoginToken {
                phone: phone.to_string(),
                phone_code_hash: sent.phone_code_hash,
            }),
            Ok(enums::auth::SentCode::Success(_)) => {
                // Only happens for future auth token logins, which this
                // client never issues; the session is already authorized.
                Err(SignInError::Other(InvocationError::Dropped))
            }
            Err(e) => Err(SignInError::Other(e)),
        }
    }

    /// Complete the login with the code received out of band.
    pub async fn sign_in(
        &mut self,
        token: &LoginToken,
        code: &str,
    ) -> Result<types::User, SignInError> {
        match self
            .invoke(&functions::auth::SignIn {
                phone_number: token.phone.clone(),
                phone_code_hash: token.phone_code_hash.clone(),
                phone_code: Some(code.to_string()),
            })
            .await
        {
            Ok(enums::auth::Authorization::Authorization(x)) => {
                self.on_authorized(&x.user);
                Ok(x.user)
            }
            Ok(enums::auth::Authorization::SignUpRequired(_)) => Err(SignInError::SignUpRequired),
            Err(err) if err.is("SESSION_PASSWORD_NEEDED") => Err(SignInError::PasswordRequired),
            Err(err) if err.is("PHONE_CODE_*") => Err(SignInError::InvalidCode),
            Err(err) => Err(SignInError::Other(err)),
        }
    }

    /// Register a new account. Use after [`Client::sign_in`] failed with
    /// [`SignInError::SignUpRequired`]. Only the last name may be empty.
    pub async fn sign_up(
        &mut self,
        token: &LoginToken,
        first_name: &str,
        last_name: &str,
    ) -> Result<types::User, SignInError> {
        match self
            .invoke(&functions::auth::SignUp {
                no_joined_notifications: false,
                phone_number: token.phone.clone(),
                phone_code_hash: token.phone_code_hash.clone(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })
            .await
        {
            Ok(enums::auth::Authorization::Authorization(x)) => {
                self.on_authorized(&x.user);
                Ok(x.user)
            }
            Ok(enums::auth::Authorization::SignUpRequired(_)) => Err(SignInError::SignUpRequired),
            Err(err) => Err(SignInError::Other(err)),
        }
    }

    /// Complete the login of an account protected by a 2FA password.
    ///
    /// Fetches the current SRP parameters, computes the proof locally
    /// (the password itself never leaves the process), and checks it.
    pub async fn check_password(&mut self, password: &str) -> Result<types::User, PasswordError> {
        let state = self
            .invoke(&functions::account::GetPassword {})
            .await
            .map_err(PasswordError::Other)?;

        let (algo, srp_b, srp_id) = match (state.current_algo, state.srp_b, state.srp_id) {
            (Some(algo), Some(srp_b), Some(srp_id)) if state.has_password => {
                (algo, srp_b, srp_id)
            }
            _ => return Err(PasswordError::NoPassword),
        };

        // The ephemeral secret for this exchange only.
        let mut a = [0u8; 256];
        getrandom::getrandom(&mut a).expect("failed to generate a secure srp secret");

        let check = srp::calculate_check(
            password.as_bytes(),
            &algo.salt1,
            &algo.salt2,
            algo.g,
            &algo.p,
            &srp_b,
            &a,
        );

        match self
            .invoke(&functions::auth::CheckPassword {
                password: types::InputCheckPasswordSrp {
                    srp_id,
                    a: check.a_pub,
                    m1: check.m1,
                },
            })
            .await
        {
            Ok(enums::auth::Authorization::Authorization(x)) => {
                self.on_authorized(&x.user);
                Ok(x.user)
            }
            Ok(enums::auth::Authorization::SignUpRequired(_)) => Err(PasswordError::NoPassword),
            Err(err) if err.is("PASSWORD_HASH_INVALID") => Err(PasswordError::InvalidPassword),
            Err(err) => Err(PasswordError::Other(err)),
        }
    }

    /// Sign out of the account. The server forgets the authorization; the
    /// local session record is removed so the next connect starts clean.
    pub async fn log_out(&mut self) -> Result<(), InvocationError> {
        self.invoke(&functions::auth::LogOut {}).await?;
        if let Some(path) = self.config.session_file() {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("failed to remove session file: {}", e);
                }
            }
        }
        Ok(())
    }

    fn on_authorized(&mut self, user: &types::User) {
        info!("logged in as user {}", user.id);
        self.entities.set_self_user(user.id, user.bot);
        self.entities
            .ingest_users(&[enums::User::User(user.clone())]);
        self.persist_all(true);
    }
}
