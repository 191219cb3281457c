//! Human-readable descriptions of well-known token claims.

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("aud", "Identifies the intended recipient of the token. For ID tokens, the application's client id."),
    ("iss", "Identifies the issuer, or authorization server, that constructs and returns the token."),
    ("iat", "The time at which the token was issued, in seconds since the Unix epoch."),
    ("nbf", "The time before which the token must not be accepted, in seconds since the Unix epoch."),
    ("exp", "The time on or after which the token must not be accepted, in seconds since the Unix epoch."),
    ("auth_time", "The time the user last authenticated, in seconds since the Unix epoch."),
    ("name", "The human-readable name of the subject of the token."),
    ("given_name", "The user's first or given name."),
    ("family_name", "The user's last name, surname or family name."),
    ("email", "The email address associated with the user account, if one is present."),
    ("preferred_username", "The primary username that represents the user, such as an email address or phone number."),
    ("unique_name", "A human-readable value that identifies the subject of the token. Not guaranteed to be unique."),
    ("upn", "The user principal name of the user."),
    ("login_hint", "An opaque claim that can be passed back as a login hint to skip account selection."),
    ("oid", "The immutable identifier of the user object in the directory, the same across applications."),
    ("sub", "The subject of the token: a pairwise identifier unique to the user and this application."),
    ("tid", "The directory tenant that the user is signing in to."),
    ("sid", "The session id, a per-session identifier used to correlate sign-out."),
    ("nonce", "A value from the original authentication request, echoed back to mitigate replay attacks."),
    ("ipaddr", "The IP address the user authenticated from."),
    ("roles", "The application roles assigned to the user, service principal or group."),
    ("groups", "The object ids of the groups the subject is a member of."),
    ("wids", "The tenant-wide directory roles assigned to the user."),
    ("scp", "The set of scopes exposed by the resource for which the client has consent."),
    ("azp", "The application id of the client that requested the token."),
    ("azpacr", "How the client authenticated: 0 public client, 1 client secret, 2 certificate."),
    ("appid", "The application id of the client that requested the token (v1.0 tokens)."),
    ("appidacr", "How the client authenticated (v1.0 tokens): 0 public client, 1 secret, 2 certificate."),
    ("idp", "The identity provider that authenticated the subject of the token."),
    ("acr", "The authentication context class reference of the authentication."),
    ("amr", "The authentication methods used to authenticate the subject."),
    ("ver", "The version of the token format."),
    ("aio", "An internal claim used by the issuer to record data for token reuse. Ignore."),
    ("rh", "An internal claim used by the issuer to revalidate tokens. Ignore."),
    ("uti", "A token identifier claim, equivalent to jti in the JWT specification. Ignore."),
    ("at_hash", "The access token hash, used to check that an access token is bound to this ID token."),
    ("c_hash", "The code hash, used to check that an authorization code is bound to this ID token."),
    ("ctry", "The user's country or region."),
    ("tenant_region_scope", "The region of the tenant the user belongs to."),
    ("xms_cc", "Client capabilities the application declared when requesting the token."),
];

/// Describe a well-known claim, or `None` for claims without a description.
pub fn describe_claim(name: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(claim, _)| *claim == name)
        .map(|(_, description)| *description)
}
