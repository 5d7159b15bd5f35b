//! rkt public API (v1alpha) bindings
//!
//! Only the `ListPods` surface is bound. With the `proto-gen` feature the
//! bindings are generated from `proto/rkt/v1alpha/api.proto` by tonic-build;
//! otherwise the hand-maintained equivalents below are used.

#[cfg(feature = "proto-gen")]
pub mod v1alpha {
    tonic::include_proto!("v1alpha");
}

#[cfg(not(feature = "proto-gen"))]
pub mod v1alpha {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct KeyValue {
        #[prost(string, tag = "1")]
        pub key: String,
        #[prost(string, tag = "2")]
        pub value: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum ImageType {
        Undefined = 0,
        Appc = 1,
        Docker = 2,
        Oci = 3,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ImageFormat {
        #[prost(enumeration = "ImageType", tag = "1")]
        pub r#type: i32,
        #[prost(string, tag = "2")]
        pub version: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Image {
        #[prost(message, optional, tag = "1")]
        pub base_format: Option<ImageFormat>,
        #[prost(string, tag = "2")]
        pub id: String,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub version: String,
        #[prost(int64, tag = "5")]
        pub import_timestamp: i64,
        #[prost(bytes = "vec", tag = "6")]
        pub manifest: Vec<u8>,
        #[prost(int64, tag = "7")]
        pub size: i64,
        #[prost(message, repeated, tag = "8")]
        pub annotations: Vec<KeyValue>,
        #[prost(message, repeated, tag = "9")]
        pub labels: Vec<KeyValue>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Network {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(string, tag = "2")]
        pub ipv4: String,
        #[prost(string, tag = "3")]
        pub ipv6: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum AppState {
        Undefined = 0,
        Running = 1,
        Exited = 2,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct App {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(message, optional, tag = "2")]
        pub image: Option<Image>,
        #[prost(enumeration = "AppState", tag = "3")]
        pub state: i32,
        #[prost(sint32, tag = "4")]
        pub exit_code: i32,
        #[prost(message, repeated, tag = "5")]
        pub annotations: Vec<KeyValue>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum PodState {
        Undefined = 0,
        Embryo = 1,
        Preparing = 2,
        Prepared = 3,
        Running = 4,
        AbortedPrepare = 5,
        Exited = 6,
        Deleting = 7,
        Garbage = 8,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Pod {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(sint32, tag = "2")]
        pub pid: i32,
        #[prost(enumeration = "PodState", tag = "3")]
        pub state: i32,
        #[prost(message, repeated, tag = "4")]
        pub apps: Vec<App>,
        #[prost(message, repeated, tag = "5")]
        pub networks: Vec<Network>,
        #[prost(bytes = "vec", tag = "6")]
        pub manifest: Vec<u8>,
        #[prost(message, repeated, tag = "7")]
        pub annotations: Vec<KeyValue>,
        #[prost(string, tag = "8")]
        pub cgroup: String,
        #[prost(int64, tag = "9")]
        pub created_at: i64,
        #[prost(int64, tag = "10")]
        pub started_at: i64,
        #[prost(int64, tag = "11")]
        pub gc_marked_at: i64,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct PodFilter {
        #[prost(string, repeated, tag = "1")]
        pub ids: Vec<String>,
        #[prost(enumeration = "PodState", repeated, tag = "2")]
        pub states: Vec<i32>,
        #[prost(string, repeated, tag = "3")]
        pub app_names: Vec<String>,
        #[prost(string, repeated, tag = "4")]
        pub image_ids: Vec<String>,
        #[prost(string, repeated, tag = "5")]
        pub network_names: Vec<String>,
        #[prost(message, repeated, tag = "6")]
        pub annotations: Vec<KeyValue>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ListPodsRequest {
        #[prost(message, repeated, tag = "1")]
        pub filters: Vec<PodFilter>,
        #[prost(bool, tag = "2")]
        pub detail: bool,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ListPodsResponse {
        #[prost(message, repeated, tag = "1")]
        pub pods: Vec<Pod>,
    }

    pub mod public_api_client {
        use super::*;
        use tonic::codegen::*;

        #[derive(Debug, Clone)]
        pub struct PublicApiClient<T> {
            inner: tonic::client::Grpc<T>,
        }

        impl PublicApiClient<tonic::transport::Channel> {
            pub fn new(channel: tonic::transport::Channel) -> Self {
                let inner = tonic::client::Grpc::new(channel);
                Self { inner }
            }
        }

        impl<T> PublicApiClient<T>
        where
            T: tonic::client::GrpcService<tonic::body::BoxBody>,
            T::Error: Into<StdError>,
            T::ResponseBody: Body<Data = Bytes> + Send + 'static,
            <T::ResponseBody as Body>::Error: Into<StdError> + Send,
        {
            pub async fn list_pods(
                &mut self,
                request: impl tonic::IntoRequest<ListPodsRequest>,
            ) -> Result<tonic::Response<ListPodsResponse>, tonic::Status> {
                self.inner.ready().await.map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
                let codec = tonic::codec::ProstCodec::default();
                let path = http::uri::PathAndQuery::from_static("/v1alpha.PublicAPI/ListPods");
                self.inner.unary(request.into_request(), path, codec).await
            }
        }
    }
}

pub use v1alpha::public_api_client::PublicApiClient;
pub use v1alpha::*;
