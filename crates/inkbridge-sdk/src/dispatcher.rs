//! Query and transaction dispatch

use inkbridge_primitives::{AccountId32, H256};
use inkbridge_scale::{Decode, Encode};
use serde_json::Value;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::contract::{ContractHandle, ContractHandleBuilder};
use crate::error::{ContractError, ContractErrorKind};
use crate::extrinsic::{
    multi_signature, signed_extrinsic, signer_payload, ContractCall, MultiAddress, SigningContext,
};
use crate::metadata::MessageSpec;
use crate::runtime::{ContractCallRequest, ContractExecResult, CONTRACTS_API_CALL};
use crate::signer::ExtensionRegistry;
use crate::types::{TxStage, TxStatus};
use crate::weight::estimate_weight;
use crate::SdkError;

/// Decoded message output, before it is classified
enum Output {
    Value(Value),
    LangError(Value),
}

/// Runs contract messages as dry-run queries or signed transactions
#[derive(Debug, Clone)]
pub struct CallDispatcher {
    config: Arc<ClientConfig>,
    handles: ContractHandleBuilder,
    extensions: Arc<ExtensionRegistry>,
}

impl CallDispatcher {
    /// Dispatcher over shared handles and extensions
    pub fn new(
        config: Arc<ClientConfig>,
        handles: ContractHandleBuilder,
        extensions: Arc<ExtensionRegistry>,
    ) -> Self {
        Self {
            config,
            handles,
            extensions,
        }
    }

    /// Dry-run `function` and return its decoded output.
    ///
    /// For messages returning ink!'s `MessageResult<T>` the inner `T` is
    /// returned. Runtime rejections, reverts and `LangError`s come back as
    /// [`SdkError::Contract`].
    pub async fn query(
        &self,
        address: &str,
        function: &str,
        args: &[Value],
    ) -> Result<Value, SdkError> {
        let handle = self.handles.build(address).await?;
        let gas_limit = estimate_weight(&self.config.weight);
        tracing::debug!(%address, %function, %gas_limit, "querying contract");

        let message = handle.message(function)?;
        let input_data = handle.encode_call(message, args)?;

        let dest = handle.account_id()?;
        let origin = match &self.config.query_origin {
            Some(origin) => origin.parse::<AccountId32>()?,
            None => dest,
        };

        let request = ContractCallRequest {
            origin,
            dest,
            value: 0,
            gas_limit: Some(gas_limit),
            storage_deposit_limit: None,
            input_data,
        };
        let raw = handle
            .connection()
            .state_call(CONTRACTS_API_CALL, &request.encode())
            .await?;

        let exec = ContractExecResult::decode(&mut raw.as_slice())?;
        let debug_message = exec.debug_message();
        tracing::debug!(
            %function,
            gas_consumed = %exec.gas_consumed,
            gas_required = %exec.gas_required,
            "query executed"
        );

        let contract_error = |kind, value| {
            tracing::warn!(%function, %kind, %value, "contract rejected query");
            SdkError::Contract(ContractError {
                kind,
                value,
                debug_message: debug_message.clone(),
            })
        };

        match exec.result {
            Err(dispatch) => Err(contract_error(ContractErrorKind::Dispatch, dispatch.to_value())),
            Ok(ret) if ret.did_revert() => {
                let value = match self.decode_output(&handle, message, &ret.data) {
                    Ok(Output::LangError(value)) => {
                        return Err(contract_error(ContractErrorKind::Lang, value))
                    }
                    Ok(Output::Value(value)) => value,
                    Err(_) => Value::String(format!("0x{}", hex::encode(&ret.data))),
                };
                Err(contract_error(ContractErrorKind::Reverted, value))
            }
            Ok(ret) => match self.decode_output(&handle, message, &ret.data)? {
                Output::Value(value) => Ok(value),
                Output::LangError(value) => Err(contract_error(ContractErrorKind::Lang, value)),
            },
        }
    }

    /// Sign `function` with the wallet at `source` and submit it.
    ///
    /// Returns once the node has accepted the extrinsic into its pool.
    pub async fn execute(
        &self,
        address: &str,
        source: &str,
        sender: &str,
        function: &str,
        args: &[Value],
    ) -> Result<TxStatus, SdkError> {
        let handle = self.handles.build(address).await?;
        let gas_limit = estimate_weight(&self.config.weight);
        let signer = self
            .extensions
            .signer(source)
            .ok_or_else(|| SdkError::SignerUnavailable(source.to_string()))?;
        tracing::debug!(%address, %function, %source, %gas_limit, "executing contract message");

        let message = handle.message(function)?;
        if !message.mutates {
            tracing::warn!(%function, "submitting a read-only message as a transaction");
        }
        let data = handle.encode_call(message, args)?;
        let sender_id = sender.parse::<AccountId32>()?;

        let call = ContractCall {
            dest: MultiAddress::Id(handle.account_id()?),
            value: 0,
            gas_limit,
            storage_deposit_limit: None,
            data,
        }
        .encode_call(&self.config.contracts);

        let connection = handle.connection();
        let context = SigningContext {
            nonce: connection.next_index(sender).await?,
            genesis_hash: connection.genesis_hash().await?,
            runtime: connection.runtime_version().await?,
        };

        let payload = signer_payload(sender, &call, &context, &self.config.signed_extensions);
        let signed = signer.sign_transaction(&payload).await.map_err(|e| match e {
            SdkError::SigningFailed(_) => e,
            other => SdkError::SigningFailed(other.to_string()),
        })?;

        let extrinsic = match &signed.signed_transaction {
            Some(tx) => hex::decode(tx.strip_prefix("0x").unwrap_or(tx))?,
            None => {
                let signature = multi_signature(&signed.signature)?;
                signed_extrinsic(&sender_id, &signature, context.nonce, 0, &call)
            }
        };

        let tx_hash = connection.submit_extrinsic(&extrinsic).await?;
        let local_hash = H256::of_extrinsic(&extrinsic);
        if tx_hash != local_hash {
            tracing::warn!(%tx_hash, %local_hash, "node reported a different extrinsic hash");
        }
        tracing::info!(%function, %sender, nonce = context.nonce, %tx_hash, "transaction submitted");

        Ok(TxStatus {
            success: true,
            stage: TxStage::Broadcast,
            tx_hash,
            nonce: context.nonce,
        })
    }

    fn decode_output(
        &self,
        handle: &ContractHandle,
        message: &MessageSpec,
        data: &[u8],
    ) -> Result<Output, SdkError> {
        let metadata = handle.metadata();
        let prefix = self.config.ss58_prefix;

        let Some(return_type) = message.return_type else {
            return Ok(Output::Value(Value::Null));
        };

        let Some((ok, err)) = metadata.message_result_types(return_type) else {
            return metadata
                .decode_value(return_type, data, prefix)
                .map(Output::Value);
        };

        match data.split_first() {
            Some((0, rest)) => metadata.decode_value(ok, rest, prefix).map(Output::Value),
            Some((1, rest)) => metadata.decode_value(err, rest, prefix).map(Output::LangError),
            Some((tag, _)) => Err(SdkError::Decode(format!(
                "invalid MessageResult tag {}",
                tag
            ))),
            None => Err(SdkError::Decode("empty message output".to_string())),
        }
    }
}
