//! Bearer token authentication for HTTP handlers.
//!
//! Tokens are HS256 JWTs carrying `sub` (the user document id), `role`, and
//! `exp`. Handlers take an [`Authenticated`] argument to require a valid
//! token and call [`Authenticated::require`] for role-restricted endpoints.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DocumentId, Error, Principal, Role};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";
const LEEWAY_SECS: u64 = 30;

/// Claims read from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User document id.
    pub sub: String,
    /// Role name, matched case-insensitively.
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: u64,
}

fn rejected() -> Error {
    Error::unauthorized("Invalid or expired token")
}

/// Verifies HS256 bearer tokens against a shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Decode and check a token.
    ///
    /// # Errors
    /// `unauthorized` for a bad signature, an expired token, or claims that
    /// do not name a user and a known role.
    pub fn verify(&self, token: &str) -> Result<Principal, Error> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            rejected()
        })?;
        let Claims { sub, role, .. } = data.claims;
        let user_id = DocumentId::new(sub).map_err(|_| rejected())?;
        let role = role.parse::<Role>().map_err(|err| {
            debug!(error = %err, "bearer token carries an unknown role");
            rejected()
        })?;
        Ok(Principal::new(user_id, role))
    }
}

/// A caller that presented a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(Principal);

impl Authenticated {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    pub fn user_id(&self) -> &DocumentId {
        self.0.user_id()
    }

    /// Require the caller to hold `role`.
    ///
    /// # Errors
    /// `forbidden` when the caller's role does not satisfy `role`.
    pub fn require(&self, role: Role) -> Result<&Principal, Error> {
        if self.0.role().satisfies(role) {
            Ok(&self.0)
        } else {
            Err(Error::forbidden("Insufficient permissions")
                .with_details(serde_json::json!({ "requiredRole": role })))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("Authentication required"))?;
    state.tokens.verify(token).map(Authenticated)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TEST_SECRET, token_with_claims};

    #[fixture]
    fn verifier() -> JwtVerifier {
        JwtVerifier::from_secret(TEST_SECRET)
    }

    fn claims(role: &str, exp: u64) -> Claims {
        Claims {
            sub: "65f1a2b3c4d5e6f708192a3b".to_owned(),
            role: role.to_owned(),
            exp,
        }
    }

    const FAR_FUTURE: u64 = 4_102_444_800;

    #[rstest]
    #[case("partner", Role::Partner)]
    #[case("ADMIN", Role::Admin)]
    #[case("super_admin", Role::SuperAdmin)]
    fn valid_tokens_yield_a_principal(
        verifier: JwtVerifier,
        #[case] raw_role: &str,
        #[case] role: Role,
    ) {
        let token = token_with_claims(&claims(raw_role, FAR_FUTURE), TEST_SECRET);

        let principal = verifier.verify(&token).expect("token verifies");

        assert_eq!(principal.role(), role);
        assert_eq!(principal.user_id().as_str(), "65f1a2b3c4d5e6f708192a3b");
    }

    #[rstest]
    #[case(claims("partner", 1_000), TEST_SECRET)]
    #[case(claims("partner", FAR_FUTURE), b"another-secret-entirely".as_slice())]
    #[case(claims("chef", FAR_FUTURE), TEST_SECRET)]
    fn invalid_tokens_are_unauthorised(
        verifier: JwtVerifier,
        #[case] claims: Claims,
        #[case] secret: &[u8],
    ) {
        let token = token_with_claims(&claims, secret);

        let err = verifier.verify(&token).expect_err("token rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid or expired token");
    }

    #[rstest]
    fn role_checks_forbid_other_roles() {
        let caller = Authenticated(Principal::new(
            DocumentId::new("u1").expect("id"),
            Role::Customer,
        ));

        let err = caller.require(Role::Partner).expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(caller.require(Role::Customer).is_ok());
    }
}
