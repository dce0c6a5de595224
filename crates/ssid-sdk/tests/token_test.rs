//! Token issuance, supply changes and transfers driven by credentials.

mod common;

use std::str::FromStr;

use common::Fixture;
use rust_decimal::Decimal;
use ssid_core::{CurrencyCode, Did, ValidationError, VcId};
use ssid_crypto::Ed25519KeyPair;
use ssid_sdk::{token_vc_property, vc_id_of, SdkError, RECIPIENT_NOT_REGISTERED};
use ssid_vc::VcType;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn oth() -> CurrencyCode {
    CurrencyCode::new("OTH").unwrap()
}

/// Issue 1000 OTH (plus 100 reservable) to a freshly registered issuer.
async fn issued(fx: &Fixture) -> (Did, Ed25519KeyPair, VcId) {
    let (did, kp) = fx.user("issuer", 1);
    let property = token_vc_property("Other", "100", 6, "OTH").unwrap();
    let vc = fx
        .client
        .vc()
        .generate_vc(property, &did, &[did.clone()], &kp)
        .await
        .unwrap();
    fx.client.vc().store_vc(&vc, &kp).await.unwrap();
    let vc_id = vc_id_of(&vc);
    fx.client.tokens().issue_token(&vc_id, "1000", &kp).await.unwrap();
    (did, kp, vc_id)
}

async fn amount_vc(
    fx: &Fixture,
    vc_type: VcType,
    token_vc: VcId,
    amount: &str,
    owner: &Did,
    kp: &Ed25519KeyPair,
) -> VcId {
    let property = fx
        .client
        .vc()
        .amount_vc_property(vc_type, token_vc, "OTH", amount)
        .await
        .unwrap();
    let vc = fx
        .client
        .vc()
        .generate_vc(property, owner, &[owner.clone()], kp)
        .await
        .unwrap();
    fx.client.vc().store_vc(&vc, kp).await.unwrap();
    vc_id_of(&vc)
}

#[tokio::test]
async fn issue_registers_token_and_balances() {
    let fx = Fixture::new();
    let (did, _, _) = issued(&fx).await;
    let tokens = fx.client.tokens();

    let data = tokens.token_data(&oth()).await.unwrap().unwrap();
    assert_eq!(data.token_name, "Other");
    assert_eq!(data.decimal, 6);
    assert_eq!(tokens.token_issuer(&oth()).await.unwrap(), Some(did.clone()));

    let balance = tokens.token_balance(&did, &oth()).await.unwrap();
    assert_eq!(balance.free, dec("1000"));
    assert_eq!(balance.reserved, dec("100"));
    assert_eq!(tokens.total_issuance(&oth()).await.unwrap(), dec("1100"));

    let locks = tokens.locks(&did, &oth()).await.unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].id, "reserved");
    assert_eq!(locks[0].amount, dec("100"));
}

#[tokio::test]
async fn token_credentials_are_single_use() {
    let fx = Fixture::new();
    let (_, kp, vc_id) = issued(&fx).await;
    let err = fx
        .client
        .tokens()
        .issue_token(&vc_id, "1", &kp)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "vc.VCAlreadyUsed");
}

#[tokio::test]
async fn mint_and_slash_adjust_supply() {
    let fx = Fixture::new();
    let (did, kp, token_vc) = issued(&fx).await;

    let mint = amount_vc(&fx, VcType::MintTokens, token_vc, "50.5", &did, &kp).await;
    fx.client.tokens().mint_token(&mint, &kp).await.unwrap();
    assert_eq!(fx.client.tokens().total_issuance(&oth()).await.unwrap(), dec("1150.5"));

    let slash = amount_vc(&fx, VcType::SlashTokens, token_vc, "0.5", &did, &kp).await;
    fx.client.tokens().slash_token(&slash, &kp).await.unwrap();
    let balance = fx.client.tokens().token_balance(&did, &oth()).await.unwrap();
    assert_eq!(balance.free, dec("1050"));
    assert_eq!(fx.client.tokens().total_issuance(&oth()).await.unwrap(), dec("1150"));
}

#[tokio::test]
async fn mint_with_wrong_credential_type_fails() {
    let fx = Fixture::new();
    let (did, kp, token_vc) = issued(&fx).await;
    let slash = amount_vc(&fx, VcType::SlashTokens, token_vc, "1", &did, &kp).await;
    let err = fx.client.tokens().mint_token(&slash, &kp).await.unwrap_err();
    assert_eq!(err.code(), "tokens.InvalidVCType");
}

#[tokio::test]
async fn transfers_move_balances() {
    let fx = Fixture::new();
    let (did, kp, token_vc) = issued(&fx).await;
    let (bob, _) = fx.user("bob01", 2);
    let tokens = fx.client.tokens();

    tokens.transfer(&bob, &oth(), "0.01", &kp).await.unwrap();
    assert_eq!(tokens.token_balance(&bob, &oth()).await.unwrap().free, dec("0.01"));

    let transfer_vc = amount_vc(&fx, VcType::TokenTransferVc, token_vc, "10", &did, &kp).await;
    tokens
        .transfer_token_with_vc(&transfer_vc, &bob, &kp)
        .await
        .unwrap();
    assert_eq!(tokens.token_balance(&bob, &oth()).await.unwrap().free, dec("10.01"));

    tokens.withdraw_reserved(&bob, &did, &oth(), "40", &kp).await.unwrap();
    let issuer = tokens.token_balance(&did, &oth()).await.unwrap();
    assert_eq!(issuer.reserved, dec("60"));
    assert_eq!(tokens.locks(&did, &oth()).await.unwrap()[0].amount, dec("60"));

    tokens.transfer_all(&bob, &oth(), &kp).await.unwrap();
    assert_eq!(tokens.token_balance(&did, &oth()).await.unwrap().free, Decimal::ZERO);
    assert_eq!(tokens.token_balance(&bob, &oth()).await.unwrap().free, dec("1040"));
}

#[tokio::test]
async fn transfer_to_unregistered_did_fails_before_submission() {
    let fx = Fixture::new();
    let (_, kp, _) = issued(&fx).await;
    let block = fx.ledger.current_block();

    let err = fx
        .client
        .tokens()
        .transfer(&Did::new("did:ssid:nobody"), &oth(), "1", &kp)
        .await
        .unwrap_err();
    assert_eq!(err.code(), RECIPIENT_NOT_REGISTERED);
    assert_eq!(fx.ledger.current_block(), block);
}

#[tokio::test]
async fn amount_normalization_uses_registered_decimal() {
    let fx = Fixture::new();
    issued(&fx).await;
    let tokens = fx.client.tokens();

    assert_eq!(tokens.to_lowest_form(&oth(), "0.01").await.unwrap(), 10_000);
    let err = tokens.to_lowest_form(&oth(), "0.0000001").await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Validation(ValidationError::PrecisionExceeded { .. })
    ));
}

#[tokio::test]
async fn unknown_currency_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .client
        .tokens()
        .to_lowest_form(&CurrencyCode::new("XYZ").unwrap(), "1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "tokens.TokenNotFound");
}
