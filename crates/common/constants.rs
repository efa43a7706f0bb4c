use ethereum_types::Address;

lazy_static::lazy_static! {
    /// Reserved account under which the whole entity store lives. Every
    /// slot the store touches belongs to this address; the account itself
    /// is instantiated lazily by the state backend on first write.
    pub static ref STORAGE_PROCESSOR_ADDRESS: Address =
        Address::from_slice(&hex::decode("0000000000000000000000000000006017a2b01e").unwrap());
}
