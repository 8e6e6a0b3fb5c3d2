use sqlx::PgConnection;

/// Something which can lend out a live database connection for the duration of a query
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Clients for the systems outside this service. Driven adapters pull their connections from here
/// so the domain never has to know where its data lives.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
