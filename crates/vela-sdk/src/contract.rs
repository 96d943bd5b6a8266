//! Smart-contract query and call helpers

use vela_primitives::Address;

use crate::abi::{encode_args, AbiError, CountedVariadicMode, ResultsParser, TypeValue, Value};
use crate::types::{NetworkConfig, QueryRequest, QueryResponse};
use crate::{Account, ContractCallBuilder, ProxyProvider, SdkError};

/// Endpoint definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDefinition {
    /// Endpoint name
    pub name: String,
    /// Input types, in call order
    pub inputs: Vec<TypeValue>,
    /// Output types, in result order
    pub outputs: Vec<TypeValue>,
}

impl EndpointDefinition {
    /// Create a new endpoint definition
    pub fn new(name: impl Into<String>, inputs: Vec<TypeValue>, outputs: Vec<TypeValue>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Check arguments against the declared inputs.
    ///
    /// Trailing optional and variadic inputs may be left out.
    pub fn check_args(&self, args: &[Value]) -> Result<(), AbiError> {
        if args.len() > self.inputs.len() {
            return Err(AbiError::Encode(format!(
                "{} takes {} arguments, got {}",
                self.name,
                self.inputs.len(),
                args.len()
            )));
        }
        for (arg, ty) in args.iter().zip(&self.inputs) {
            let actual = arg.type_value();
            if actual != *ty {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        if let Some(ty) = self.inputs[args.len()..]
            .iter()
            .find(|ty| !matches!(ty, TypeValue::Optional(_) | TypeValue::Variadic { .. }))
        {
            return Err(AbiError::Encode(format!(
                "{}: missing argument of type {}",
                self.name, ty
            )));
        }
        Ok(())
    }
}

/// Contract at a known address with its endpoint definitions
#[derive(Debug, Clone)]
pub struct SmartContract {
    address: Address,
    endpoints: Vec<EndpointDefinition>,
    parser: ResultsParser,
}

impl SmartContract {
    /// Contract with no endpoints yet
    pub fn new(address: Address) -> Self {
        Self {
            address,
            endpoints: Vec::new(),
            parser: ResultsParser::new(),
        }
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add an endpoint with builder pattern
    pub fn with_endpoint(mut self, endpoint: EndpointDefinition) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Select how counted variadic results are laid out
    pub fn with_counted_mode(mut self, mode: CountedVariadicMode) -> Self {
        self.parser = self.parser.with_counted_mode(mode);
        self
    }

    /// Get an endpoint by name
    pub fn endpoint(&self, name: &str) -> Result<&EndpointDefinition, SdkError> {
        self.endpoints
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AbiError::Encode(format!("unknown endpoint: {}", name)).into())
    }

    /// Build the query request for `endpoint`
    pub fn query_request(
        &self,
        endpoint: &str,
        args: &[Value],
        caller: Option<Address>,
    ) -> Result<QueryRequest, SdkError> {
        let definition = self.endpoint(endpoint)?;
        definition.check_args(args)?;
        Ok(QueryRequest {
            sc_address: self.address,
            func_name: definition.name.clone(),
            caller,
            value: None,
            args: encode_args(args)?,
        })
    }

    /// Run a query without decoding its results
    pub async fn query_raw(
        &self,
        provider: &ProxyProvider,
        endpoint: &str,
        args: &[Value],
        caller: Option<Address>,
    ) -> Result<QueryResponse, SdkError> {
        let request = self.query_request(endpoint, args, caller)?;
        let response = provider.query_contract(&request).await?;
        if response.is_failure() {
            return Err(SdkError::Query {
                code: response.return_code,
                message: response.return_message,
            });
        }
        Ok(response)
    }

    /// Run a query and decode its results against the declared outputs.
    ///
    /// One output yields the value itself, several yield a `Multi`.
    pub async fn query(
        &self,
        provider: &ProxyProvider,
        endpoint: &str,
        args: &[Value],
    ) -> Result<Value, SdkError> {
        let response = self.query_raw(provider, endpoint, args, None).await?;
        let outputs = &self.endpoint(endpoint)?.outputs;
        tracing::debug!(
            contract = %self.address,
            endpoint,
            buffers = response.return_data.len(),
            "query returned"
        );
        Ok(self.parser.parse_base64(&response.return_data, outputs)?)
    }

    /// Start a call transaction to `endpoint`
    pub fn call_builder(
        &self,
        config: &NetworkConfig,
        account: &Account,
        endpoint: &str,
        args: Vec<Value>,
    ) -> Result<ContractCallBuilder, SdkError> {
        let definition = self.endpoint(endpoint)?;
        definition.check_args(&args)?;
        Ok(ContractCallBuilder::new(config, account, self.address, definition.name.clone()).args(args))
    }
}
