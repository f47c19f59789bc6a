/// Generated read side of a client: `get_x`, `list_xs` and `subscribe_xs` over one table field.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $field:ident: $entity:ty, $error:ty, $entity_name_snake:ident, $plural_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.$field.get(id).await.map_err(<$error>::from)
                }

                /// All rows in insertion order.
                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $plural_snake>](&self) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.$field.list().await.map_err(<$error>::from)
                }

                pub fn [<subscribe_ $plural_snake>](
                    &self,
                    filter: $crate::realtime::ChangeFilter<$entity>,
                ) -> $crate::realtime::ChangeStream<$entity> {
                    self.$field.subscribe(filter)
                }
            }
        }
    };
}

/// Generated `delete_x` for tables that allow deletes.
#[macro_export]
macro_rules! impl_client_delete {
    ($client_name:ident, $field:ident: $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: String) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.$field.delete(id).await.map_err(<$error>::from)
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident, $plural_snake:ident) => {
        $crate::impl_client_new!($client_name, $entity);
        $crate::impl_client_methods!($client_name, inner: $entity, $error, $entity_name_snake, $plural_snake);
    };
}

/// Map framework failures onto a domain error with `NotFound`,
/// `ValidationError` and `ActorCommunicationError` variants.
#[macro_export]
macro_rules! impl_framework_error {
    ($error:ty) => {
        impl From<$crate::actor_framework::FrameworkError> for $error {
            fn from(err: $crate::actor_framework::FrameworkError) -> Self {
                use $crate::actor_framework::FrameworkError;
                match err {
                    FrameworkError::NotFound(id) => Self::NotFound(id),
                    FrameworkError::Rejected(reason) => Self::ValidationError(reason),
                    other => Self::ActorCommunicationError(other.to_string()),
                }
            }
        }
    };
}
